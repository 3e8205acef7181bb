use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::{CompletionClient, ResponsesClient};
use crate::orchestrator::RagOrchestrator;

/// Shared application state. Everything in here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<RagOrchestrator>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;
        let client: Arc<dyn CompletionClient> =
            Arc::new(ResponsesClient::new(http_client, &config.llm));

        Ok(Self::with_client(config, client))
    }

    /// Build state around an arbitrary completion backend.
    pub fn with_client(config: Config, client: Arc<dyn CompletionClient>) -> Self {
        let config = Arc::new(config);
        let orchestrator = Arc::new(RagOrchestrator::new(config.clone(), client));
        Self {
            config,
            orchestrator,
        }
    }
}
