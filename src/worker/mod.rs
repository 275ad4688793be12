//! Cache-Reset Worker
//!
//! Runs in its own context, separate from the page. On activation it purges
//! every cache in the registry, waits for all deletions, then unregisters
//! itself. Requests are always fetched fresh.

/// Cache storage backends.
mod registry;

use std::path::PathBuf;

use thiserror::Error;

pub use registry::{
    CacheRegistry,
    DirCacheRegistry,
    MemoryCacheRegistry,
};

use crate::content::{
    CacheMode,
    FetchError,
    Request,
    ResourceFetcher,
};

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Invalid cache name '{0}'")]
    InvalidCacheName(String),

    #[error("Caches still present after purge: {0:?}")]
    CachesRemaining(Vec<String>),

    #[error("Cache storage error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installed,
    /// Activated with every cache purged; the registration is gone.
    Redundant,
}

/// What the host should do once installation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Activate immediately instead of waiting for open pages to close.
    SkipWaiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// Caches actually deleted, in enumeration order.
    pub deleted: Vec<String>,
    /// Whether a registration existed and was removed.
    pub unregistered: bool,
}

#[derive(Debug)]
pub struct CacheResetWorker {
    /// Lifecycle position.
    state: WorkerState,
}

impl Default for CacheResetWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheResetWorker {
    #[must_use]
    pub const fn new() -> Self {
        Self { state: WorkerState::Installed }
    }

    #[must_use]
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    pub fn on_install(&self) -> InstallOutcome {
        tracing::debug!("Cache-reset worker installed");
        InstallOutcome::SkipWaiting
    }

    /// Delete every cache, then unregister.
    ///
    /// Unregistration only happens once all deletions have completed and the
    /// registry reports no caches left. Any failure aborts activation and
    /// leaves the worker registered.
    pub async fn on_activate<R>(&mut self, registry: &R) -> Result<ActivationReport, WorkerError>
    where
        R: CacheRegistry + ?Sized,
    {
        let names = registry.keys().await?;
        let existed =
            futures::future::try_join_all(names.iter().map(|name| registry.delete(name))).await?;
        let deleted: Vec<String> = names
            .into_iter()
            .zip(existed)
            .filter_map(|(name, existed)| existed.then_some(name))
            .collect();

        let remaining = registry.keys().await?;
        if !remaining.is_empty() {
            tracing::error!(?remaining, "Caches survived the purge, staying registered");
            return Err(WorkerError::CachesRemaining(remaining));
        }

        let unregistered = registry.unregister().await?;
        self.state = WorkerState::Redundant;

        tracing::info!(caches = deleted.len(), "All caches cleared and service worker unregistered");
        Ok(ActivationReport { deleted, unregistered })
    }

    /// Pass the request through to the network, bypassing every cache.
    pub async fn on_fetch<F>(&self, fetcher: &F, request: &Request) -> Result<Vec<u8>, FetchError>
    where
        F: ResourceFetcher + ?Sized,
    {
        let fresh = request.clone().with_cache(CacheMode::NoStore);
        fetcher.fetch(&fresh).await
    }
}
