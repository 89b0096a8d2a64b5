//! Dependency initialization and wiring for the synchronizer.

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::SearchSyncError;
use search_sync_pipeline::OrchestratorConfig;
use search_sync_repository::{OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Engine connection shared by the orchestrator and the query client.
    pub engine: Arc<dyn SearchEngineClient>,
    pub orchestrator: OrchestratorConfig,
}

impl Dependencies {
    /// Connect to the search engine described by `settings` and verify it
    /// is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SearchSyncError)` - If the client cannot be built or the cluster is unhealthy
    pub async fn new(settings: &Settings) -> Result<Self, SearchSyncError> {
        info!(
            url = %settings.connection.url,
            max_concurrency = settings.orchestrator.max_concurrency,
            "Initializing dependencies"
        );

        let client = OpenSearchClient::new(settings.connection.clone())
            .map_err(|e| SearchSyncError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        let healthy = client
            .health_check()
            .await
            .map_err(|e| SearchSyncError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(SearchSyncError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        Ok(Self {
            engine: Arc::new(client),
            orchestrator: settings.orchestrator.clone(),
        })
    }
}
