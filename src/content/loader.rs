//! Content Store loading with built-in fallback

use thiserror::Error;

use super::ContentStore;
use super::fetch::{
    FetchError,
    Request,
    ResourceFetcher,
};

/// Default location of the Content Store document.
pub const CONTENT_PATH: &str = "data/content.json";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to fetch content document: {0}")]
    Fetch(#[from] FetchError),

    #[error("Content document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to parse content document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch and parse the Content Store document.
///
/// # Errors
/// Returns error if the fetch fails or the document is malformed.
pub async fn try_load_content_store<F>(fetcher: &F, path: &str) -> Result<ContentStore, ContentError>
where
    F: ResourceFetcher + ?Sized,
{
    let body = fetcher.fetch(&Request::get(path)).await?;
    let text = String::from_utf8(body)?;
    Ok(ContentStore::from_json(&text)?)
}

/// Load the Content Store, committing to the built-in fallback on any failure.
///
/// There is no retry: a single failed attempt is final for this page load.
pub async fn load_content_store<F>(fetcher: &F, path: &str) -> ContentStore
where
    F: ResourceFetcher + ?Sized,
{
    match try_load_content_store(fetcher, path).await {
        Ok(store) => {
            tracing::debug!(path, languages = ?store.languages().collect::<Vec<_>>(), "Content loaded");
            store
        }
        Err(error) => {
            tracing::error!("Error loading content data: {error}");
            ContentStore::fallback()
        }
    }
}
