use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::{Config, LlmConfig};
use crate::search::catalog::CatalogSearcher;
use crate::search::CandidateSearcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub searcher: Arc<dyn CandidateSearcher>,
    pub llm_config: Arc<RwLock<LlmConfig>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let searcher = Arc::new(CatalogSearcher::new(
            http_client.clone(),
            config.catalog.clone(),
        ));

        let llm_config = config.llm.clone();

        Ok(Self {
            config,
            http_client,
            searcher,
            llm_config: Arc::new(RwLock::new(llm_config)),
        })
    }
}
