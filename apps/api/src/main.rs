mod analysis;
mod config;
mod errors;
mod jobs;
mod llm_client;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::LlmJobAnalyzer;
use crate::config::Config;
use crate::jobs::repository::JobRepository;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::FileJobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Tracker API v{}", env!("CARGO_PKG_VERSION"));

    let store = FileJobStore::new(&config.data_file);
    info!("Job store at {}", store.path().display());

    // Initialize LLM client (optional: analysis falls back to static content without it)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), &config.llm_api_url, config.analysis_timeout)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; job analysis will serve fallback content");
            None
        }
    };

    let state = AppState {
        jobs: Arc::new(JobRepository::new(Arc::new(store))),
        analyzer: Arc::new(LlmJobAnalyzer::new(llm)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
