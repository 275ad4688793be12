//! Entry point: renders the hotel page from a site directory and resets its caches.
//!
//! Usage: `hotel-guide [SITE_ROOT] [LANG]`

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::Parser;
use hotel_guide::HotelApp;
use hotel_guide::app::PageEvent;
use hotel_guide::config::ConfigManager;
use hotel_guide::content::audit::find_missing_keys;
use hotel_guide::content::{
    SiteFetcher,
    load_content_store,
};
use hotel_guide::display::MemoryTree;
use hotel_guide::preference::FilePreferences;
use hotel_guide::worker::{
    CacheResetWorker,
    CacheRegistry,
    DirCacheRegistry,
};
use tracing_subscriber::EnvFilter;

/// Render the hotel page from a site directory and reset its caches.
#[derive(Debug, Parser)]
#[command(name = "hotel-guide", version, about)]
struct Cli {
    /// Site directory holding `.hotel-guide.json` and the content document
    #[arg(value_name = "SITE_ROOT", default_value = ".")]
    site_root: PathBuf,

    /// Language to switch to after startup (e.g. `en`)
    #[arg(value_name = "LANG")]
    lang: Option<String>,
}

/// Accordion sections of the hotel page, in display order.
const PAGE_SECTIONS: [&str; 6] = ["checkin", "wifi", "parking", "breakfast", "rules", "contact"];

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { site_root, lang: language } = Cli::parse();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let mut config_manager = ConfigManager::new();
    if let Err(error) = config_manager.load_settings(Some(site_root.clone())) {
        tracing::error!("Failed to load settings: {error}");
        return ExitCode::FAILURE;
    }
    let settings = config_manager.get_settings().clone();

    let fetcher = SiteFetcher::new(&site_root);
    let store = load_content_store(&fetcher, &settings.content_path).await;
    for missing in find_missing_keys(&store) {
        tracing::warn!(language = %missing.language, key = %missing.key, "Translation missing");
    }

    let tree = MemoryTree::from_store(&store, &PAGE_SECTIONS);
    let preferences = FilePreferences::new(site_root.join(".hotel-guide").join("preferences.json"));
    let (mut app, _rx) = HotelApp::new(tree, store, preferences, &settings);
    if let Some(language) = language {
        app.handle(PageEvent::LanguageSelected(language));
    }

    let tree = app.tree();
    let rendered = |key: &str| {
        tree.element_for_key(key).map(|element| tree.text_content(element)).unwrap_or_default()
    };
    tracing::info!(
        language = app.localizer().current_language(),
        hotel_name = %rendered("hotel_name"),
        welcome = %rendered("welcome"),
        expanded = ?app.accordion().expanded().collect::<Vec<_>>(),
        "Page rendered"
    );

    match reset_caches(&site_root.join(".cache")).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Cache reset failed: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn reset_caches(cache_root: &Path) -> Result<(), hotel_guide::worker::WorkerError> {
    let registry = DirCacheRegistry::new(cache_root);
    if !registry.is_registered().await? {
        tracing::debug!(root = ?cache_root, "No cache-reset worker registered");
    }

    let mut worker = CacheResetWorker::new();
    worker.on_install();
    let report = worker.on_activate(&registry).await?;
    tracing::info!(deleted = ?report.deleted, unregistered = report.unregistered, "Caches reset");
    Ok(())
}
