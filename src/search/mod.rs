//! Candidate search collaborator interface.
//!
//! The core is agnostic about how candidates are found (relational query,
//! vector index, keyword search); it only consumes a ranked, finite list
//! per category. An empty result is a degraded outcome, not an error.

pub mod catalog;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ComponentCandidate, PriceBand};

/// External search collaborator: category + price band + free-text hint →
/// candidates ordered by the collaborator's own relevance notion.
#[async_trait]
pub trait CandidateSearcher: Send + Sync {
    async fn search(
        &self,
        category: &str,
        band: &PriceBand,
        max_results: usize,
        context_hint: &str,
    ) -> Result<Vec<ComponentCandidate>>;
}
