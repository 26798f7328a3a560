//! Market News Pulse API Server
//!
//! HTTP API server exposing the news sentiment pipeline.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use pulse_core::SourceKind;
use pulse_news::AdapterSettings;
use pulse_services::{
    sources_from_json, Fetcher, Lexicon, NewsRefresher, NewsService, NewsStore, PipelineConfig,
    SourceRegistry,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub news_service: Arc<NewsService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pulse_api=debug,pulse_services=debug")),
        )
        .init();

    info!("Starting Market News Pulse API");

    let config = PipelineConfig::from_env()?;

    let lexicon = match std::env::var("PULSE_LEXICON_PATH") {
        Ok(path) => {
            info!("Loading lexicon from: {}", path);
            Lexicon::from_path(&path)?
        }
        Err(_) => Lexicon::builtin()?,
    };

    // Source list: PULSE_SOURCES overrides the curated defaults
    let mut sources = sources_from_json(std::env::var("PULSE_SOURCES").ok().as_deref())?;

    let news_api_key = std::env::var("NEWSAPI_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    if news_api_key.is_none() {
        info!("No NEWSAPI_KEY found - news API sources start disabled");
        for source in sources.iter_mut().filter(|s| s.kind == SourceKind::NewsApi) {
            source.enabled = false;
        }
    }

    let settings = AdapterSettings {
        timeout: config.fetch_timeout(),
        news_api_key,
    };
    let fetcher = Fetcher::from_configs(&sources, &settings);

    // Initialize news store (in-memory + SQLite)
    let db_path = std::env::var("PULSE_DB_PATH").unwrap_or_else(|_| "data/pulse.db".to_string());
    info!("Initializing news store at: {}", db_path);
    let store = NewsStore::open(&db_path, config.max_retained);

    let news_service = Arc::new(NewsService::new(
        config,
        store,
        SourceRegistry::new(sources),
        fetcher,
        &lexicon,
    ));

    // Refresh on startup and on a fixed cadence afterwards
    let refresher = Arc::new(NewsRefresher::new(Arc::clone(&news_service)));
    refresher.start();

    let state = AppState { news_service };
    let app = routes::app(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
