//! Cross-encoder reranking via an OpenAI-compatible `/v1/rerank` endpoint.
//!
//! Sends a single batch request with all query-document pairs instead of
//! making N individual LLM chat calls. Typical latency: 50-100ms vs 1-3s.

use serde::{Deserialize, Serialize};

use crate::config::RerankerConfig;
use crate::error::{AdvisorError, Result};

/// Score all documents against the query in one batched call.
///
/// Returns sigmoid-normalized scores aligned with `documents`; documents
/// the endpoint did not score come back as 0.0. Errs when the endpoint is
/// unreachable or returns an error.
pub async fn score_batch(
    client: &reqwest::Client,
    config: &RerankerConfig,
    query: &str,
    documents: &[String],
) -> Result<Vec<f32>> {
    let base_url = config
        .base_url
        .as_deref()
        .ok_or_else(|| AdvisorError::configuration("reranker base_url not configured"))?;

    let model = config.model.as_deref().unwrap_or("default");

    let url = format!("{}/v1/rerank", base_url.trim_end_matches('/'));

    let req_body = RerankRequest {
        model: model.to_string(),
        query: query.to_string(),
        documents: documents.to_vec(),
        top_n: documents.len(),
    };

    let timeout = std::time::Duration::from_secs(config.timeout_secs.min(30));

    let resp = client
        .post(&url)
        .timeout(timeout)
        .json(&req_body)
        .send()
        .await
        .map_err(|e| AdvisorError::retrieval(format!("failed to reach reranker endpoint: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AdvisorError::retrieval(format!(
            "reranker returned {status}: {body}"
        )));
    }

    let body: RerankResponse = resp
        .json()
        .await
        .map_err(|e| AdvisorError::retrieval(format!("failed to parse reranker response: {e}")))?;

    let mut scores = vec![0.0f32; documents.len()];
    for r in body.results {
        if r.index < scores.len() {
            scores[r.index] = sigmoid(r.relevance_score);
        }
    }

    Ok(scores)
}

/// Sigmoid normalization: maps raw logits to 0-1 range.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct RerankRequest {
    model: String,
    query: String,
    documents: Vec<String>,
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResultRaw>,
}

#[derive(Deserialize)]
struct RerankResultRaw {
    index: usize,
    relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_zero() {
        let s = sigmoid(0.0);
        assert!((s - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sigmoid_large_positive() {
        let s = sigmoid(10.0);
        assert!(s > 0.999);
    }

    #[test]
    fn test_sigmoid_large_negative() {
        let s = sigmoid(-10.0);
        assert!(s < 0.001);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        // sigmoid(x) + sigmoid(-x) = 1
        let x = 2.5f32;
        let sum = sigmoid(x) + sigmoid(-x);
        assert!((sum - 1.0).abs() < 1e-6);
    }
}
