pub mod assemble;
pub mod config;
pub mod plan;
pub mod pricing;
pub mod rerank;

use axum::http::StatusCode;

use crate::error::AdvisorError;

/// Map domain errors onto HTTP: bad inputs are the caller's problem,
/// unreachable collaborators are a bad gateway.
pub(crate) fn error_response(err: AdvisorError) -> (StatusCode, String) {
    let status = match &err {
        AdvisorError::Configuration(_) => StatusCode::BAD_REQUEST,
        AdvisorError::Retrieval(_) => StatusCode::BAD_GATEWAY,
    };
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_maps_to_400() {
        let (status, body) = error_response(AdvisorError::configuration("bad archetype"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("bad archetype"));
    }

    #[test]
    fn test_retrieval_maps_to_502() {
        let (status, _) = error_response(AdvisorError::retrieval("catalog down"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
