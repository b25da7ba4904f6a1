use axum::extract::State;
use axum::Json;

use crate::config::LlmConfig;
use crate::models::LlmConfigUpdate;
use crate::state::AppState;

/// GET /api/config - Current LLM configuration (api_key redacted).
pub async fn get_config(State(state): State<AppState>) -> Json<LlmConfig> {
    let mut config = state.llm_config.read().clone();
    config.api_key = config.api_key.map(|_| "***".to_string());
    Json(config)
}

/// PUT /api/config - Update mutable LLM settings at runtime.
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<LlmConfigUpdate>,
) -> Json<LlmConfig> {
    let mut config = state.llm_config.write();
    if let Some(provider) = update.provider {
        config.provider = provider;
    }
    if let Some(model) = update.chat_model {
        config.chat_model = model;
    }
    if let Some(key) = update.api_key {
        config.api_key = Some(key);
    }

    let mut redacted = config.clone();
    redacted.api_key = redacted.api_key.map(|_| "***".to_string());
    Json(redacted)
}
