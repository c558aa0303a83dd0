mod config;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod routes;
mod rubric;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rubric API v{}", env!("CARGO_PKG_VERSION"));

    // A malformed static rubric is fatal before serving anything
    rubric::validate_rubric()?;
    info!(
        "Rubric validated: {} rules, max penalty {}",
        rubric::RUBRIC_SIZE,
        rubric::MAX_POSSIBLE_PENALTY
    );

    let llm = LlmClient::new(&config)?;
    info!("LLM client initialized (model: {})", config.model);

    let state = AppState::new(Arc::new(llm), config.clone());
    info!(
        "Retry policy: {} attempts per group, {}s per attempt",
        state.settings.retry.total_attempts(),
        config.attempt_timeout_secs
    );

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
