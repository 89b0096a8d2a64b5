//! # Search Sync
//!
//! Keeps a set of search indices synchronized with relational data sources
//! and offers a single query surface over them.
//!
//! A [`SearchSync`] is built from an engine connection and the data sources
//! to mirror. [`SearchSync::sync`] provisions missing indices and bulk loads
//! every record; the query methods search the resulting indices.
//!
//! ```ignore
//! let settings = Settings::from_env()?;
//! init_tracing(settings.log_format)?;
//!
//! let search = SearchSync::from_settings(&settings, sources, vec!["password".into()]).await?;
//! search.sync(SyncOptions::refreshing()).await;
//! let hits = search.search("earthsea", "*", &SearchOptions::default()).await?;
//! ```

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, Settings};
pub use telemetry::{init_tracing, LogFormat};

pub use search_sync_pipeline::{
    DataSource, DataSourceDescriptor, OrchestratorConfig, SourceSpec, SyncError, SyncReport,
};
pub use search_sync_repository::{
    BulkSummary, ConnectionConfig, OpenSearchClient, RelationalError, RelationalModel,
    SearchEngineClient, SearchError,
};
pub use search_sync_shared::{
    Association, AttributeSchema, AttributeType, FindOptions, Fuzziness, MultiSearchOptions,
    Projection, Record, SearchOptions, SearchOutcome, SyncOptions,
};

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, instrument};

use search_sync_pipeline::{normalize_sources, SyncOrchestrator};
use search_sync_repository::SearchClient;

/// Errors returned by the synchronizer facade.
#[derive(Error, Debug)]
pub enum SearchSyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Sync error.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl SearchSyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Synchronizer and query surface over one search engine.
pub struct SearchSync {
    engine: Arc<dyn SearchEngineClient>,
    orchestrator: SyncOrchestrator,
    client: SearchClient,
}

impl SearchSync {
    /// Create a synchronizer over `engine` for `sources`.
    ///
    /// `excluded_fields` are left out of the documents of every data source
    /// that has no projection of its own. Fails if a data source has an
    /// empty name or two data sources map to the same index.
    pub fn new(
        engine: Arc<dyn SearchEngineClient>,
        sources: Vec<DataSource>,
        excluded_fields: Vec<String>,
    ) -> Result<Self, SearchSyncError> {
        Self::with_config(engine, sources, excluded_fields, OrchestratorConfig::default())
    }

    /// Create a synchronizer with a custom orchestrator configuration.
    pub fn with_config(
        engine: Arc<dyn SearchEngineClient>,
        sources: Vec<DataSource>,
        excluded_fields: Vec<String>,
        config: OrchestratorConfig,
    ) -> Result<Self, SearchSyncError> {
        let specs = normalize_sources(sources).map_err(|e| match e {
            SyncError::ConfigError(msg) => SearchSyncError::ConfigError(msg),
            other => SearchSyncError::SyncError(other),
        })?;

        info!(
            sources = specs.len(),
            excluded_fields = excluded_fields.len(),
            "Configured search sync"
        );

        Ok(Self {
            orchestrator: SyncOrchestrator::with_config(engine.clone(), specs, excluded_fields, config),
            client: SearchClient::new(engine.clone()),
            engine,
        })
    }

    /// Create a synchronizer over an OpenSearch connection.
    ///
    /// The connection is not verified; use [`SearchSync::health_check`] or
    /// [`SearchSync::from_settings`] for that.
    pub fn connect(
        config: ConnectionConfig,
        sources: Vec<DataSource>,
        excluded_fields: Vec<String>,
    ) -> Result<Self, SearchSyncError> {
        let engine = OpenSearchClient::new(config)?;
        Self::new(Arc::new(engine), sources, excluded_fields)
    }

    /// Create a synchronizer from environment settings, verifying the
    /// engine is healthy.
    pub async fn from_settings(
        settings: &Settings,
        sources: Vec<DataSource>,
        excluded_fields: Vec<String>,
    ) -> Result<Self, SearchSyncError> {
        let dependencies = Dependencies::new(settings).await?;
        Self::with_config(
            dependencies.engine,
            sources,
            excluded_fields,
            dependencies.orchestrator,
        )
    }

    /// The normalized data sources.
    pub fn sources(&self) -> &[SourceSpec] {
        self.orchestrator.sources()
    }

    /// Synchronize every data source.
    ///
    /// Returns `false` if the live index list could not be read or a data
    /// source could not be extracted. Provisioning and load failures are
    /// logged; use [`SearchSync::sync_with_report`] to inspect them.
    pub async fn sync(&self, options: SyncOptions) -> bool {
        match self.orchestrator.run(options).await {
            Ok(report) => report.is_success(),
            Err(e) => {
                error!(error = %e, "Sync aborted");
                false
            }
        }
    }

    /// Synchronize every data source and return the full report.
    pub async fn sync_with_report(&self, options: SyncOptions) -> Result<SyncReport, SearchSyncError> {
        Ok(self.orchestrator.run(options).await?)
    }

    /// Query-string search over `scope` (an index, a comma separated list of
    /// indices, or `*`).
    pub async fn search(
        &self,
        query: &str,
        scope: &str,
        options: &SearchOptions,
    ) -> Result<SearchOutcome, SearchSyncError> {
        Ok(self.client.search(query, scope, options).await?)
    }

    /// Send a caller-built search request.
    pub async fn custom_search(&self, params: Value) -> Result<Value, SearchSyncError> {
        Ok(self.client.custom_search(params).await?)
    }

    /// Fan `query` out over several indices with one multi-search.
    pub async fn search_in_indices(
        &self,
        query: &str,
        options: &MultiSearchOptions,
    ) -> Result<Value, SearchSyncError> {
        Ok(self.client.search_in_indices(query, options).await?)
    }

    /// Names of every live index, sorted.
    pub async fn all_indices(&self) -> Result<Vec<String>, SearchSyncError> {
        Ok(self.client.all_indices().await?)
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchSyncError> {
        Ok(self.client.index_exists(index).await?)
    }

    /// Whether the engine cluster reports a usable state.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool, SearchSyncError> {
        Ok(self.engine.health_check().await?)
    }
}
