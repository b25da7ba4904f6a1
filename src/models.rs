use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdvisorError;

/// A named build profile determining budget share distribution.
///
/// Closed enumeration: unknown archetype names fail at parse time with a
/// configuration error, never at share-table lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildArchetype {
    Gaming,
    Office,
    Server,
}

impl BuildArchetype {
    pub const ALL: [BuildArchetype; 3] = [Self::Gaming, Self::Office, Self::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gaming => "gaming",
            Self::Office => "office",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for BuildArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildArchetype {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gaming" => Ok(Self::Gaming),
            "office" => Ok(Self::Office),
            "server" => Ok(Self::Server),
            other => Err(AdvisorError::configuration(format!(
                "unknown build archetype '{other}' (expected gaming, office, or server)"
            ))),
        }
    }
}

/// Acceptable [lower, upper] price range derived from an allocated sub-budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub lower: f64,
    pub upper: f64,
}

impl PriceBand {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower && price <= self.upper
    }
}

/// Per-category price bands computed from an archetype's share table and a
/// total budget. Computed fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub archetype: BuildArchetype,
    pub total_budget: f64,
    pub bands: BTreeMap<String, PriceBand>,
}

/// A concrete component option returned by the search collaborator.
/// Immutable once retrieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCandidate {
    pub category: String,
    pub name: String,
    pub price: f64,
    /// Free-form spec attributes: socket, form_factor, max_memory,
    /// memory_slots, capacity_total, module_count, supported_form_factors.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Where the candidate came from (catalog row id, product URL).
    #[serde(default)]
    pub source: Option<String>,
}

impl ComponentCandidate {
    /// Look up an attribute, treating empty/whitespace values as absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn numeric_attr(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|v| v.parse::<f64>().ok())
    }

    /// One-line spec summary, suitable as a rerank document.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} ({}, {:.2})", self.name, self.category, self.price)];
        for (key, value) in &self.attributes {
            let value = value.trim();
            if !value.is_empty() {
                parts.push(format!("{key}: {value}"));
            }
        }
        parts.join("; ")
    }
}

/// Tri-state outcome of a single compatibility rule. `Skipped` (missing
/// component or attribute) is distinct from `Fail` so reports stay honest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub status: RuleStatus,
    pub reason: String,
}

/// Rule name → outcome for every applicable rule. All rules run even when
/// one fails, so the report is always complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub rules: BTreeMap<String, RuleOutcome>,
}

impl CompatibilityReport {
    pub fn insert(&mut self, rule: &str, status: RuleStatus, reason: impl Into<String>) {
        self.rules.insert(
            rule.to_string(),
            RuleOutcome {
                status,
                reason: reason.into(),
            },
        );
    }

    /// Valid iff no rule has status `Fail`. Skipped rules do not invalidate.
    pub fn is_valid(&self) -> bool {
        self.rules.values().all(|r| r.status != RuleStatus::Fail)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&String, &RuleOutcome)> {
        self.rules
            .iter()
            .filter(|(_, r)| r.status == RuleStatus::Fail)
    }
}

/// Terminal state of an assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    /// Every category filled and every rule passed or was skipped.
    Complete,
    /// At least one category unfilled or at least one rule failed.
    Incomplete,
}

/// Assembled parts list plus diagnostics. Returned even when incomplete;
/// partial results are always preferred over total failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub id: Uuid,
    pub archetype: BuildArchetype,
    pub state: BuildState,
    /// One selected candidate per filled category, in plan order.
    pub selected: Vec<ComponentCandidate>,
    /// Categories the searcher returned no candidates for.
    pub unfilled: Vec<String>,
    pub report: CompatibilityReport,
    pub total_price: f64,
}

/// A document paired with its relevance score after reranking. Ordering is
/// by score descending; ties keep original retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDocument {
    pub document: String,
    pub score: f32,
}

/// Normalized price observation from an upstream scraper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub component: String,
    pub price: f64,
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
}

// ─── API request/response types ──────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub archetype: String,
    pub budget: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssembleRequest {
    pub archetype: String,
    pub budget: f64,
    /// Free-text hint forwarded verbatim to the search collaborator.
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompatRequest {
    pub candidates: Vec<ComponentCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompatResponse {
    pub valid: bool,
    pub report: CompatibilityReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankStrategy {
    Judge,
    CrossEncoder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<String>,
    /// Truncation after rerank; falls back to the configured default when
    /// omitted.
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default = "default_strategy")]
    pub strategy: RerankStrategy,
}

fn default_strategy() -> RerankStrategy {
    RerankStrategy::Judge
}

#[derive(Debug, Clone, Serialize)]
pub struct RerankResponse {
    pub query: String,
    pub results: Vec<RankedDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceCompareRequest {
    pub records: Vec<PriceRecord>,
}

/// LLM config update request
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfigUpdate {
    pub provider: Option<String>,
    // base_url intentionally omitted: immutable at runtime to prevent SSRF
    pub chat_model: Option<String>,
    pub api_key: Option<String>,
}
