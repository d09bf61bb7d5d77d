mod admin;
mod config;
mod db;
mod errors;
mod flows;
mod llm_client;
mod portfolio;
mod resilience;
mod routes;
mod state;
mod web_content;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::portfolio::profile::OwnerProfile;
use crate::routes::build_router;
use crate::state::AppState;
use crate::web_content::WebScraper;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_settings())?;
    info!("LLM client initialized (text model: {})", llm.text_model());

    let scraper = WebScraper::new()?;

    let profile = OwnerProfile::load(config.profile_path.as_deref())?;
    info!("Owner profile loaded for {}", profile.name);

    let policy = config.retry_policy();
    info!(
        "Retry policy: {} attempts, {}ms base delay, failure mode override: {:?}",
        policy.max_attempts(),
        policy.base_delay().as_millis(),
        config.failure_mode
    );

    // Build app state
    let state = AppState {
        db,
        generator: Arc::new(llm),
        content_source: Arc::new(scraper),
        profile: Arc::new(profile),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
