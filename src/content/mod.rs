//! Content Store: multilingual page text and how it is loaded
pub mod audit;
pub mod fetch;
/// Fetching and parsing the content document.
mod loader;
/// Content Store types.
mod store;

pub use fetch::{
    CacheMode,
    FetchError,
    Request,
    ResourceFetcher,
    SiteFetcher,
};
pub use loader::{
    CONTENT_PATH,
    ContentError,
    load_content_store,
    try_load_content_store,
};
pub use store::{
    ContentStore,
    ContentTable,
    ContentValue,
};
