//! HTTP-backed catalog searcher: the production `CandidateSearcher`
//! implementation talking JSON to a component catalog service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::error::{AdvisorError, Result};
use crate::models::{ComponentCandidate, PriceBand};
use crate::search::CandidateSearcher;

pub struct CatalogSearcher {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogSearcher {
    pub fn new(client: reqwest::Client, config: CatalogConfig) -> Self {
        Self { client, config }
    }
}

#[derive(Serialize)]
struct CatalogSearchRequest<'a> {
    category: &'a str,
    min_price: f64,
    max_price: f64,
    limit: usize,
    hint: &'a str,
}

#[derive(Deserialize)]
struct CatalogSearchResponse {
    candidates: Vec<ComponentCandidate>,
}

#[async_trait]
impl CandidateSearcher for CatalogSearcher {
    async fn search(
        &self,
        category: &str,
        band: &PriceBand,
        max_results: usize,
        context_hint: &str,
    ) -> Result<Vec<ComponentCandidate>> {
        let url = format!(
            "{}/api/components/search",
            self.config.base_url.trim_end_matches('/')
        );

        let req = CatalogSearchRequest {
            category,
            min_price: band.lower,
            max_price: band.upper,
            limit: max_results,
            hint: context_hint,
        };

        let timeout = std::time::Duration::from_secs(self.config.timeout_secs);

        let resp = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                AdvisorError::retrieval(format!("failed to reach catalog for '{category}': {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::retrieval(format!(
                "catalog search for '{category}' returned {status}: {body}"
            )));
        }

        let body: CatalogSearchResponse = resp.json().await.map_err(|e| {
            AdvisorError::retrieval(format!("malformed catalog response for '{category}': {e}"))
        })?;

        // Keep the collaborator's ordering; only drop rows that cannot be
        // priced or named.
        Ok(body
            .candidates
            .into_iter()
            .filter(|c| !c.name.trim().is_empty() && c.price.is_finite() && c.price >= 0.0)
            .take(max_results)
            .collect())
    }
}
