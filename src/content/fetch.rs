//! Resource fetching from the site root

use std::path::{
    Component,
    Path,
    PathBuf,
};

use thiserror::Error;

/// Errors raised while fetching a site resource.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Resource path '{0}' is outside the site root")]
    InvalidPath(String),

    #[error("Failed to read resource '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Cache behaviour requested for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    /// Go to the origin and never store the response.
    NoStore,
}

/// A resource request, addressed relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: String,
    pub cache: CacheMode,
}

impl Request {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self { path: path.into(), cache: CacheMode::Default }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }
}

/// Source of site resources (content document, pages, assets).
#[allow(async_fn_in_trait)]
pub trait ResourceFetcher {
    async fn fetch(&self, request: &Request) -> Result<Vec<u8>, FetchError>;
}

/// Serves resources straight from a directory on disk.
#[derive(Debug, Clone)]
pub struct SiteFetcher {
    /// Site directory every request path is resolved against.
    root: PathBuf,
}

impl SiteFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path below the root, rejecting anything that climbs out.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || relative.components().any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ResourceFetcher for SiteFetcher {
    async fn fetch(&self, request: &Request) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(&request.path)?;
        tracing::debug!(path = %path.display(), cache = ?request.cache, "Fetching resource");
        tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io { path: request.path.clone(), source })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn fetch_reads_file_below_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("data")).unwrap();
        std::fs::write(temp_dir.path().join("data/content.json"), "{}").unwrap();
        let fetcher = SiteFetcher::new(temp_dir.path());

        let body = fetcher.fetch(&Request::get("data/content.json")).await.unwrap();

        assert_eq!(body, b"{}");
    }

    #[tokio::test]
    async fn fetch_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = SiteFetcher::new(temp_dir.path());

        let result = fetcher.fetch(&Request::get("data/content.json")).await;

        assert!(matches!(result, Err(FetchError::Io { .. })));
    }

    #[rstest]
    #[case::parent_dir("../etc/passwd")]
    #[case::nested_parent("data/../../secret")]
    #[case::current_dir("./data/content.json")]
    #[case::empty("")]
    fn resolve_rejects_paths_outside_root(#[case] path: &str) {
        let fetcher = SiteFetcher::new("/srv/site");

        assert!(matches!(fetcher.resolve(path), Err(FetchError::InvalidPath(_))));
    }

    #[rstest]
    fn resolve_strips_leading_slash() {
        let fetcher = SiteFetcher::new("/srv/site");

        assert_eq!(fetcher.resolve("/sw.js").unwrap(), PathBuf::from("/srv/site/sw.js"));
    }
}
