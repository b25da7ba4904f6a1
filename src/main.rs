use axum::routing::{get, post, put};
use axum::Router;
use tracing_subscriber::EnvFilter;

use build_advisor::api;
use build_advisor::config::Config;
use build_advisor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    tracing::info!("Catalog: {}", config.catalog.base_url);

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/api/plan", post(api::plan::plan))
        .route("/api/compat", post(api::plan::check_compat))
        .route("/api/rerank", post(api::rerank::rerank))
        .route("/api/assemble", post(api::assemble::assemble))
        .route("/api/prices/compare", post(api::pricing::compare_prices))
        .route("/api/config", get(api::config::get_config))
        .route("/api/config", put(api::config::update_config))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
