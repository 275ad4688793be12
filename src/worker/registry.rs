//! Cache registries the worker can purge

use std::collections::BTreeSet;
use std::path::{
    Path,
    PathBuf,
};

use tokio::sync::Mutex;

use super::WorkerError;

/// Platform cache storage plus the worker's own registration.
#[allow(async_fn_in_trait)]
pub trait CacheRegistry {
    /// Names of every cache currently stored.
    async fn keys(&self) -> Result<Vec<String>, WorkerError>;

    /// Delete one cache. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, WorkerError>;

    /// Remove the worker registration. Returns whether it was registered.
    async fn unregister(&self) -> Result<bool, WorkerError>;

    async fn is_registered(&self) -> Result<bool, WorkerError>;
}

/// In-memory registry.
#[derive(Debug, Default)]
pub struct MemoryCacheRegistry {
    /// Guarded cache names and registration flag.
    inner: Mutex<MemoryState>,
}

/// Contents of a `MemoryCacheRegistry`.
#[derive(Debug, Default)]
struct MemoryState {
    /// Installed cache names.
    caches: BTreeSet<String>,
    /// Whether the worker registration still exists.
    registered: bool,
}

impl MemoryCacheRegistry {
    /// Registered worker with the given caches installed.
    pub fn with_caches<I, S>(caches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Mutex::new(MemoryState {
                caches: caches.into_iter().map(Into::into).collect(),
                registered: true,
            }),
        }
    }
}

impl CacheRegistry for MemoryCacheRegistry {
    async fn keys(&self) -> Result<Vec<String>, WorkerError> {
        Ok(self.inner.lock().await.caches.iter().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        Ok(self.inner.lock().await.caches.remove(name))
    }

    async fn unregister(&self) -> Result<bool, WorkerError> {
        let mut state = self.inner.lock().await;
        Ok(std::mem::replace(&mut state.registered, false))
    }

    async fn is_registered(&self) -> Result<bool, WorkerError> {
        Ok(self.inner.lock().await.registered)
    }
}

/// Registry backed by a directory: every subdirectory is a cache and the
/// registration is a marker file.
#[derive(Debug, Clone)]
pub struct DirCacheRegistry {
    /// Directory holding one subdirectory per cache.
    root: PathBuf,
}

impl DirCacheRegistry {
    /// Marker file whose presence means the worker is registered.
    const REGISTRATION_FILE: &'static str = ".registration";

    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and the registration marker.
    pub async fn register(&self) -> Result<(), WorkerError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| io_error(&self.root, e))?;
        let marker = self.registration_path();
        tokio::fs::write(&marker, b"").await.map_err(|e| io_error(&marker, e))
    }

    /// Path of the registration marker.
    fn registration_path(&self) -> PathBuf {
        self.root.join(Self::REGISTRATION_FILE)
    }

    /// Cache directory for `name`, refusing names that are not a single path segment.
    fn cache_path(&self, name: &str) -> Result<PathBuf, WorkerError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(WorkerError::InvalidCacheName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// Wrap an I/O failure with the path it happened on.
fn io_error(path: &Path, source: std::io::Error) -> WorkerError {
    WorkerError::Io { path: path.to_path_buf(), source }
}

impl CacheRegistry for DirCacheRegistry {
    async fn keys(&self) -> Result<Vec<String>, WorkerError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) =
            entries.next_entry().await.map_err(|e| io_error(&self.root, e))?
        {
            let file_type = entry.file_type().await.map_err(|e| io_error(&entry.path(), e))?;
            if file_type.is_dir() {
                let name = entry.file_name().into_string().map_err(|name| {
                    WorkerError::InvalidCacheName(name.to_string_lossy().into_owned())
                })?;
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        let path = self.cache_path(name)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn unregister(&self) -> Result<bool, WorkerError> {
        let marker = self.registration_path();
        match tokio::fs::remove_file(&marker).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&marker, e)),
        }
    }

    async fn is_registered(&self) -> Result<bool, WorkerError> {
        Ok(tokio::fs::try_exists(self.registration_path()).await.unwrap_or(false))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn memory_registry_delete_and_unregister() {
        let registry = MemoryCacheRegistry::with_caches(["hotel-v1", "hotel-v2"]);

        assert!(registry.delete("hotel-v1").await.unwrap());
        assert!(!registry.delete("hotel-v1").await.unwrap());
        assert_eq!(registry.keys().await.unwrap(), ["hotel-v2"]);

        assert!(registry.unregister().await.unwrap());
        assert!(!registry.unregister().await.unwrap());
        assert!(!registry.is_registered().await.unwrap());
    }

    #[tokio::test]
    async fn dir_registry_lists_only_directories() {
        let temp_dir = TempDir::new().unwrap();
        let registry = DirCacheRegistry::new(temp_dir.path().join("caches"));
        registry.register().await.unwrap();
        std::fs::create_dir_all(registry.root().join("hotel-v2/assets")).unwrap();
        std::fs::create_dir_all(registry.root().join("hotel-v1")).unwrap();
        std::fs::write(registry.root().join("stray.txt"), "x").unwrap();

        assert_eq!(registry.keys().await.unwrap(), ["hotel-v1", "hotel-v2"]);
        assert!(registry.is_registered().await.unwrap());
    }

    #[tokio::test]
    async fn dir_registry_missing_root_has_no_caches() {
        let temp_dir = TempDir::new().unwrap();
        let registry = DirCacheRegistry::new(temp_dir.path().join("missing"));

        assert!(registry.keys().await.unwrap().is_empty());
        assert!(!registry.is_registered().await.unwrap());
        assert!(!registry.unregister().await.unwrap());
    }

    #[tokio::test]
    async fn dir_registry_delete_removes_nested_content() {
        let temp_dir = TempDir::new().unwrap();
        let registry = DirCacheRegistry::new(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("hotel-v1/data")).unwrap();
        std::fs::write(temp_dir.path().join("hotel-v1/data/content.json"), "{}").unwrap();

        assert!(registry.delete("hotel-v1").await.unwrap());
        assert!(!temp_dir.path().join("hotel-v1").exists());
        assert!(!registry.delete("hotel-v1").await.unwrap());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn dir_registry_refuses_non_utf8_cache_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let registry = DirCacheRegistry::new(temp_dir.path());
        registry.register().await.unwrap();
        std::fs::create_dir(temp_dir.path().join(OsStr::from_bytes(b"cache-\xff"))).unwrap();

        assert!(matches!(registry.keys().await, Err(WorkerError::InvalidCacheName(_))));

        let mut worker = crate::worker::CacheResetWorker::new();
        assert!(worker.on_activate(&registry).await.is_err());
        assert!(registry.is_registered().await.unwrap());
        assert!(temp_dir.path().join(OsStr::from_bytes(b"cache-\xff")).exists());
    }

    #[rstest]
    #[case::parent("..")]
    #[case::nested("a/b")]
    #[case::empty("")]
    fn dir_registry_rejects_path_like_names(#[case] name: &str) {
        let registry = DirCacheRegistry::new("/tmp/caches");

        assert!(matches!(registry.cache_path(name), Err(WorkerError::InvalidCacheName(_))));
    }
}
