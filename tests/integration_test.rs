//! Integration tests for the build-advisor pipeline.
//!
//! These tests exercise the full plan → search → validate flow without
//! requiring a running catalog or LLM (the searcher is an in-memory stub;
//! rerank ordering is exercised through its pure contract).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use build_advisor::assemble::BuildAssembler;
use build_advisor::budget;
use build_advisor::compat;
use build_advisor::config::{BudgetConfig, SearchConfig};
use build_advisor::error::AdvisorError;
use build_advisor::models::{
    BuildArchetype, BuildState, ComponentCandidate, PriceBand, RuleStatus,
};
use build_advisor::rerank::rank_documents;
use build_advisor::search::CandidateSearcher;

/// Searcher stub serving canned candidates per category.
struct StubSearcher {
    by_category: HashMap<String, Vec<ComponentCandidate>>,
}

impl StubSearcher {
    fn new() -> Self {
        Self {
            by_category: HashMap::new(),
        }
    }

    fn with(mut self, category: &str, candidates: Vec<ComponentCandidate>) -> Self {
        self.by_category.insert(category.to_string(), candidates);
        self
    }
}

#[async_trait]
impl CandidateSearcher for StubSearcher {
    async fn search(
        &self,
        category: &str,
        _band: &PriceBand,
        max_results: usize,
        _context_hint: &str,
    ) -> build_advisor::error::Result<Vec<ComponentCandidate>> {
        Ok(self
            .by_category
            .get(category)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .collect())
    }
}

fn candidate(category: &str, name: &str, price: f64, attrs: &[(&str, &str)]) -> ComponentCandidate {
    let attributes: BTreeMap<String, String> = attrs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ComponentCandidate {
        category: category.to_string(),
        name: name.to_string(),
        price,
        attributes,
        source: Some(format!("catalog:{name}")),
    }
}

/// Helper: a catalog covering the default gaming plan with an AM5 platform.
fn gaming_catalog() -> StubSearcher {
    StubSearcher::new()
        .with(
            "chipset",
            vec![
                candidate("chipset", "RTX 4070 Ti", 60000.0, &[]),
                candidate("chipset", "RX 7800 XT", 55000.0, &[]),
            ],
        )
        .with(
            "cpu",
            vec![candidate("cpu", "Ryzen 7 7700X", 42000.0, &[("socket", "AM5")])],
        )
        .with(
            "ram",
            vec![candidate(
                "ram",
                "Fury Beast 32GB",
                28000.0,
                &[("capacity_total", "32"), ("module_count", "2")],
            )],
        )
        .with(
            "motherboard",
            vec![candidate(
                "motherboard",
                "B650 Tomahawk",
                15000.0,
                &[
                    ("socket", "AM5"),
                    ("max_memory", "128"),
                    ("memory_slots", "4"),
                    ("form_factor", "ATX"),
                ],
            )],
        )
}

fn assembler(stub: StubSearcher) -> BuildAssembler {
    BuildAssembler::new(
        Arc::new(stub),
        BudgetConfig::default(),
        &SearchConfig::default(),
    )
}

#[test]
fn test_end_to_end_gaming_price_bands() {
    let plan = budget::allocate(&BudgetConfig::default(), BuildArchetype::Gaming, 150_000.0)
        .unwrap();

    let expected = [
        ("chipset", 54_000.0, 66_000.0),
        ("cpu", 40_500.0, 49_500.0),
        ("ram", 27_000.0, 33_000.0),
        ("motherboard", 13_500.0, 16_500.0),
    ];
    for (category, lower, upper) in expected {
        let band = plan.bands[category];
        assert!((band.lower - lower).abs() < 1e-6, "{category} lower");
        assert!((band.upper - upper).abs() < 1e-6, "{category} upper");
    }
}

#[tokio::test]
async fn test_end_to_end_complete_build() {
    let build = assembler(gaming_catalog())
        .assemble(BuildArchetype::Gaming, 150_000.0, "1440p gaming")
        .await
        .unwrap();

    assert_eq!(build.state, BuildState::Complete);
    assert!(build.unfilled.is_empty());
    assert_eq!(build.selected.len(), 4);
    assert!(build.report.is_valid());
    // The searcher's top chipset wins, not the cheaper second hit
    assert!(build.selected.iter().any(|c| c.name == "RTX 4070 Ti"));
}

#[tokio::test]
async fn test_end_to_end_empty_ram_marks_incomplete() {
    let catalog = gaming_catalog().with("ram", vec![]);
    let build = assembler(catalog)
        .assemble(BuildArchetype::Gaming, 150_000.0, "")
        .await
        .unwrap();

    assert_eq!(build.state, BuildState::Incomplete);
    assert_eq!(build.unfilled, vec!["ram".to_string()]);
    assert_eq!(build.selected.len(), 3);
    // The ram rule is reported as skipped, not silently dropped
    assert_eq!(
        build.report.rules[compat::RULE_RAM_MOTHERBOARD].status,
        RuleStatus::Skipped
    );
}

#[tokio::test]
async fn test_end_to_end_socket_mismatch_reports_both_values() {
    let catalog = gaming_catalog().with(
        "cpu",
        vec![candidate("cpu", "Core i5-13600K", 42000.0, &[("socket", "LGA1700")])],
    );
    let build = assembler(catalog)
        .assemble(BuildArchetype::Gaming, 150_000.0, "")
        .await
        .unwrap();

    assert_eq!(build.state, BuildState::Incomplete);
    assert!(build.unfilled.is_empty());

    let outcome = &build.report.rules[compat::RULE_CPU_MOTHERBOARD];
    assert_eq!(outcome.status, RuleStatus::Fail);
    assert!(outcome.reason.contains("LGA1700"));
    assert!(outcome.reason.contains("AM5"));
}

#[tokio::test]
async fn test_unknown_archetype_rejected_before_planning() {
    let err = "htpc".parse::<BuildArchetype>().unwrap_err();
    assert!(matches!(err, AdvisorError::Configuration(_)));
}

#[test]
fn test_rerank_contract_over_candidate_summaries() {
    // Candidate summaries as rerank documents, scored by a simulated judge
    let documents: Vec<String> = [
        candidate("chipset", "RTX 4070 Ti", 60000.0, &[("memory", "12")]),
        candidate("chipset", "RX 7800 XT", 55000.0, &[("memory", "16")]),
        candidate("chipset", "GTX 1650", 15000.0, &[("memory", "4")]),
    ]
    .iter()
    .map(|c| c.summary())
    .collect();

    // Judge scores: middle document most relevant, last unparseable → 0
    let scores = [7.0, 9.0, 0.0];
    let ranked = rank_documents(&documents, &scores, 2);

    assert_eq!(ranked.len(), 2);
    assert!(ranked[0].document.contains("RX 7800 XT"));
    assert!(ranked[1].document.contains("RTX 4070 Ti"));
}
