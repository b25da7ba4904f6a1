//! Retrieval reranking: re-score an initial candidate document list with a
//! more precise relevance signal than the original retrieval step produced.
//!
//! Two interchangeable strategies behind one contract:
//! - [`judge`]: per-document 1-10 relevance scoring via an LLM chat call.
//! - [`cross_encoder`]: one batched `/v1/rerank` call scoring all
//!   (query, document) pairs at once.
//!
//! Both sort descending by score with a stable sort, so ties keep the
//! original retrieval order, and truncate to `min(top_n, len)`.

pub mod cross_encoder;
pub mod judge;

use crate::config::{LlmConfig, RerankerConfig};
use crate::error::Result;
use crate::models::{RankedDocument, RerankStrategy};

/// Rerank `documents` against `query` using the requested strategy.
///
/// Fails with a retrieval error only when the scoring collaborator is
/// unreachable; a single unparseable score degrades to 0 instead.
pub async fn rerank(
    client: &reqwest::Client,
    llm: &LlmConfig,
    reranker: &RerankerConfig,
    strategy: RerankStrategy,
    query: &str,
    documents: &[String],
    top_n: usize,
) -> Result<Vec<RankedDocument>> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let scores = match strategy {
        RerankStrategy::Judge => judge::score_documents(client, llm, query, documents).await?,
        RerankStrategy::CrossEncoder => {
            cross_encoder::score_batch(client, reranker, query, documents).await?
        }
    };

    Ok(rank_documents(documents, &scores, top_n))
}

/// Pair documents with scores, sort descending, keep the top `top_n`.
///
/// The sort is stable, so documents with equal scores stay in retrieval
/// order (no tie-break is defined upstream).
pub fn rank_documents(documents: &[String], scores: &[f32], top_n: usize) -> Vec<RankedDocument> {
    let mut ranked: Vec<RankedDocument> = documents
        .iter()
        .zip(scores.iter().chain(std::iter::repeat(&0.0)))
        .map(|(document, score)| RankedDocument {
            document: document.clone(),
            score: *score,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_length_is_min_of_top_n_and_len() {
        let documents = docs(&["a", "b", "c"]);
        let scores = [1.0, 2.0, 3.0];
        assert_eq!(rank_documents(&documents, &scores, 2).len(), 2);
        assert_eq!(rank_documents(&documents, &scores, 10).len(), 3);
    }

    #[test]
    fn test_rank_sorted_descending() {
        let documents = docs(&["low", "high", "mid"]);
        let scores = [1.0, 9.0, 5.0];
        let ranked = rank_documents(&documents, &scores, 3);
        assert_eq!(ranked[0].document, "high");
        assert_eq!(ranked[1].document, "mid");
        assert_eq!(ranked[2].document, "low");
    }

    #[test]
    fn test_ties_keep_retrieval_order() {
        let documents = docs(&["first", "second", "third"]);
        let scores = [5.0, 5.0, 5.0];
        let ranked = rank_documents(&documents, &scores, 3);
        assert_eq!(ranked[0].document, "first");
        assert_eq!(ranked[1].document, "second");
        assert_eq!(ranked[2].document, "third");
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let documents = docs(&["a", "b", "c", "d"]);
        let scores = [3.0, 1.0, 4.0, 2.0];
        let ranked = rank_documents(&documents, &scores, 2);
        for r in &ranked {
            assert!(documents.contains(&r.document));
        }
    }

    #[test]
    fn test_missing_scores_default_to_zero() {
        // Scorer returned fewer scores than documents
        let documents = docs(&["scored", "unscored"]);
        let scores = [7.0];
        let ranked = rank_documents(&documents, &scores, 2);
        assert_eq!(ranked[0].document, "scored");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_empty_documents() {
        assert!(rank_documents(&[], &[], 5).is_empty());
    }
}
