//! Build assembly orchestration:
//! Planning → Searching → Validating → {Complete, Incomplete}.
//!
//! Searching fans out one task per category (categories are independent)
//! behind a concurrency bound. One category's failure never cancels the
//! others: the category is recorded unfilled and assembly continues, so the
//! caller always gets a partial build plus diagnostics once planning
//! succeeded.

use std::sync::Arc;

use uuid::Uuid;

use crate::budget;
use crate::compat;
use crate::config::{BudgetConfig, SearchConfig};
use crate::error::Result;
use crate::models::{Build, BuildArchetype, BuildState, ComponentCandidate, PriceBand};
use crate::search::CandidateSearcher;

pub struct BuildAssembler {
    searcher: Arc<dyn CandidateSearcher>,
    budget: BudgetConfig,
    max_results: usize,
    max_concurrent: usize,
}

impl BuildAssembler {
    pub fn new(
        searcher: Arc<dyn CandidateSearcher>,
        budget: BudgetConfig,
        search: &SearchConfig,
    ) -> Self {
        Self {
            searcher,
            budget,
            max_results: search.max_results,
            max_concurrent: search.max_concurrent.max(1),
        }
    }

    /// Run the full assembly pipeline. Fails only when the budget plan
    /// itself cannot be computed; every later problem degrades to an
    /// `Incomplete` build with diagnostics.
    pub async fn assemble(
        &self,
        archetype: BuildArchetype,
        total_budget: f64,
        context_hint: &str,
    ) -> Result<Build> {
        // ── Planning ─────────────────────────────────────────────
        let plan = budget::allocate(&self.budget, archetype, total_budget)?;
        let categories: Vec<(String, PriceBand)> = plan
            .bands
            .iter()
            .map(|(c, b)| (c.clone(), *b))
            .collect();

        // ── Searching: bounded fan-out, one task per category ────
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(categories.len());

        for (category, band) in &categories {
            let searcher = self.searcher.clone();
            let category = category.clone();
            let band = *band;
            let hint = context_hint.to_string();
            let max_results = self.max_results;
            let sem = semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem.acquire().await;
                match searcher.search(&category, &band, max_results, &hint).await {
                    // Top-ranked result wins; no backtracking across combinations.
                    Ok(candidates) => candidates.into_iter().next(),
                    Err(e) => {
                        tracing::warn!("Search failed for category '{category}': {e}");
                        None
                    }
                }
            });
            handles.push(handle);
        }

        let mut selected = Vec::new();
        let mut unfilled = Vec::new();
        for ((category, _), handle) in categories.iter().zip(handles) {
            match handle.await {
                Ok(Some(candidate)) => {
                    tracing::debug!("Selected for '{category}': {}", candidate.summary());
                    selected.push(candidate);
                }
                Ok(None) => unfilled.push(category.clone()),
                Err(e) => {
                    tracing::warn!("Search task for '{category}' did not complete: {e}");
                    unfilled.push(category.clone());
                }
            }
        }

        // ── Validating ───────────────────────────────────────────
        let report = compat::check(&selected);
        let state = if unfilled.is_empty() && report.is_valid() {
            BuildState::Complete
        } else {
            BuildState::Incomplete
        };

        let total_price = selected.iter().map(|c| c.price).sum();

        Ok(Build {
            id: Uuid::new_v4(),
            archetype,
            state,
            selected,
            unfilled,
            report,
            total_price,
        })
    }
}
