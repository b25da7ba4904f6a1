use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::models::BuildArchetype;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration (judge reranking)
    pub llm: LlmConfig,
    /// Cross-encoder reranker configuration
    pub reranker: RerankerConfig,
    /// Component catalog search collaborator
    pub catalog: CatalogConfig,
    /// Budget allocation parameters
    pub budget: BudgetConfig,
    /// Candidate search fan-out parameters
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for judge scoring
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            api_key: None,
        }
    }
}

/// Configuration for the cross-encoder reranker sidecar (e.g. llama-server
/// with a reranker model behind `/v1/rerank`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankerConfig {
    /// Base URL for the reranker API (e.g. "http://127.0.0.1:8082").
    pub base_url: Option<String>,
    /// Model name to send in the rerank request.
    pub model: Option<String>,
    /// Request timeout in seconds (capped at 30).
    pub timeout_secs: u64,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            timeout_secs: 10,
        }
    }
}

/// Configuration for the external component catalog searcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog search service.
    pub base_url: String,
    /// Per-search timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Half-width of the price band around each category budget (0.10 = ±10%).
    pub band_tolerance: f64,
    /// Per-archetype category share tables.
    pub shares: ShareTables,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            band_tolerance: 0.10,
            shares: ShareTables::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Candidates requested per category.
    pub max_results: usize,
    /// Concurrent category searches during assembly.
    pub max_concurrent: usize,
    /// Default rerank truncation when the request does not specify one.
    pub rerank_top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            max_concurrent: 4,
            rerank_top_n: 5,
        }
    }
}

/// Category share tables, one per archetype. The mapping is exhaustive over
/// the enum, so a known archetype can never miss its table at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareTables {
    pub gaming: BTreeMap<String, f64>,
    pub office: BTreeMap<String, f64>,
    pub server: BTreeMap<String, f64>,
}

fn shares(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

impl Default for ShareTables {
    fn default() -> Self {
        Self {
            gaming: shares(&[
                ("chipset", 0.4),
                ("cpu", 0.3),
                ("ram", 0.2),
                ("motherboard", 0.1),
            ]),
            office: shares(&[
                ("cpu", 0.35),
                ("motherboard", 0.2),
                ("ram", 0.2),
                ("case", 0.15),
            ]),
            server: shares(&[
                ("cpu", 0.4),
                ("ram", 0.25),
                ("motherboard", 0.2),
                ("case", 0.05),
            ]),
        }
    }
}

impl ShareTables {
    pub fn for_archetype(&self, archetype: BuildArchetype) -> &BTreeMap<String, f64> {
        match archetype {
            BuildArchetype::Gaming => &self.gaming,
            BuildArchetype::Office => &self.office,
            BuildArchetype::Server => &self.server,
        }
    }

    /// Reject empty category names and shares outside (0, 1].
    pub fn validate(&self) -> Result<()> {
        for archetype in BuildArchetype::ALL {
            let table = self.for_archetype(archetype);
            if table.is_empty() {
                return Err(AdvisorError::configuration(format!(
                    "share table for '{archetype}' is empty"
                )));
            }
            for (category, share) in table {
                if category.trim().is_empty() {
                    return Err(AdvisorError::configuration(format!(
                        "share table for '{archetype}' has an empty category name"
                    )));
                }
                if !share.is_finite() || *share <= 0.0 || *share > 1.0 {
                    return Err(AdvisorError::configuration(format!(
                        "share {share} for '{archetype}/{category}' must be in (0, 1]"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            reranker: RerankerConfig::default(),
            catalog: CatalogConfig::default(),
            budget: BudgetConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BUILD_ADVISOR_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("RERANKER_BASE_URL") {
            config.reranker.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("RERANKER_MODEL") {
            config.reranker.model = Some(model);
        }
        if let Ok(val) = std::env::var("RERANKER_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.reranker.timeout_secs = v.min(30); // Cap at 30s
            }
        }
        if let Ok(url) = std::env::var("CATALOG_BASE_URL") {
            config.catalog.base_url = url;
        }
        if let Ok(val) = std::env::var("CATALOG_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.catalog.timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("BUILD_ADVISOR_BAND_TOLERANCE") {
            if let Ok(v) = val.parse() {
                config.budget.band_tolerance = v;
            }
        }
        if let Ok(val) = std::env::var("BUILD_ADVISOR_SHARES") {
            match serde_json::from_str::<ShareTables>(&val) {
                Ok(tables) => config.budget.shares = tables,
                Err(e) => tracing::warn!("Ignoring BUILD_ADVISOR_SHARES: {e}"),
            }
        }
        if let Ok(val) = std::env::var("BUILD_ADVISOR_MAX_RESULTS") {
            if let Ok(v) = val.parse() {
                config.search.max_results = v;
            }
        }
        if let Ok(val) = std::env::var("BUILD_ADVISOR_MAX_CONCURRENT_SEARCHES") {
            if let Ok(v) = val.parse() {
                config.search.max_concurrent = v;
            }
        }
        if let Ok(val) = std::env::var("BUILD_ADVISOR_RERANK_TOP_N") {
            if let Ok(v) = val.parse() {
                config.search.rerank_top_n = v;
            }
        }

        config
    }

    /// Validate everything that would otherwise fail mid-request.
    pub fn validate(&self) -> Result<()> {
        self.budget.shares.validate()?;
        if !self.budget.band_tolerance.is_finite()
            || self.budget.band_tolerance < 0.0
            || self.budget.band_tolerance >= 1.0
        {
            return Err(AdvisorError::configuration(format!(
                "band tolerance {} must be in [0, 1)",
                self.budget.band_tolerance
            )));
        }
        if self.search.max_concurrent == 0 {
            return Err(AdvisorError::configuration(
                "max_concurrent searches must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_default_gaming_shares_match_dataset() {
        let tables = ShareTables::default();
        let gaming = tables.for_archetype(BuildArchetype::Gaming);
        assert_eq!(gaming.get("chipset"), Some(&0.4));
        assert_eq!(gaming.get("cpu"), Some(&0.3));
        assert_eq!(gaming.get("ram"), Some(&0.2));
        assert_eq!(gaming.get("motherboard"), Some(&0.1));
    }

    #[test]
    fn test_zero_share_rejected() {
        let mut tables = ShareTables::default();
        tables.gaming.insert("gpu".to_string(), 0.0);
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("gaming/gpu"));
    }

    #[test]
    fn test_share_above_one_rejected() {
        let mut tables = ShareTables::default();
        tables.server.insert("cpu".to_string(), 1.5);
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut tables = ShareTables::default();
        tables.office.clear();
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("office"));
    }

    #[test]
    fn test_share_tables_parse_from_json() {
        let json = r#"{
            "gaming": {"gpu": 0.5, "cpu": 0.3},
            "office": {"cpu": 0.4},
            "server": {"cpu": 0.6}
        }"#;
        let tables: ShareTables = serde_json::from_str(json).unwrap();
        tables.validate().unwrap();
        assert_eq!(
            tables.for_archetype(BuildArchetype::Gaming).get("gpu"),
            Some(&0.5)
        );
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        let mut config = Config::default();
        config.budget.band_tolerance = 1.0;
        assert!(config.validate().is_err());
    }
}
