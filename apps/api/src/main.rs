mod config;
mod db;
mod errors;
mod form;
mod gateway;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::init_record_store;
use crate::form::sessions::SessionStore;
use crate::gateway::Gateway;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (missing credentials are tolerated, bad numbers are not)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Succession API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize MongoDB once; `None` leaves the service up with storage disabled
    let store = init_record_store(&config).await;

    // Initialize LLM client
    if config.openai_api_key.is_none() {
        error!("OPENAI_API_KEY not found; question answering is disabled");
    }
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        sessions: SessionStore::new(config.session_ttl),
        gateway: Arc::new(Gateway::new(store, Arc::new(llm))),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the form's origin once it is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
