use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AdvisorError, Result};
use crate::models::{RerankRequest, RerankResponse};
use crate::rerank;
use crate::state::AppState;

/// POST /api/rerank - Re-score a document list against a query with the
/// requested strategy and truncate to top-n.
pub async fn rerank(
    State(state): State<AppState>,
    Json(req): Json<RerankRequest>,
) -> std::result::Result<Json<RerankResponse>, (StatusCode, String)> {
    let query = validate_query(&req.query).map_err(super::error_response)?;
    let top_n = resolve_top_n(req.top_n, state.config.search.rerank_top_n)
        .map_err(super::error_response)?;

    let llm_config = state.llm_config.read().clone();
    let results = rerank::rerank(
        &state.http_client,
        &llm_config,
        &state.config.reranker,
        req.strategy,
        &query,
        &req.documents,
        top_n,
    )
    .await
    .map_err(super::error_response)?;

    Ok(Json(RerankResponse { query, results }))
}

fn validate_query(raw: &str) -> Result<String> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(AdvisorError::configuration("query must not be empty"));
    }
    Ok(query.to_string())
}

/// An omitted top-n falls back to the configured default; an explicit one
/// must be positive.
fn resolve_top_n(requested: Option<usize>, configured_default: usize) -> Result<usize> {
    match requested {
        None => Ok(configured_default),
        Some(0) => Err(AdvisorError::configuration(
            "top_n must be a positive integer",
        )),
        Some(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_top_n_uses_configured_default() {
        assert_eq!(resolve_top_n(None, 3).unwrap(), 3);
    }

    #[test]
    fn test_explicit_top_n_overrides_default() {
        assert_eq!(resolve_top_n(Some(7), 3).unwrap(), 7);
    }

    #[test]
    fn test_zero_top_n_is_configuration_error() {
        let err = resolve_top_n(Some(0), 3).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_blank_query_is_configuration_error() {
        let err = validate_query("   ").unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(validate_query("  best gpu ").unwrap(), "best gpu");
    }
}
