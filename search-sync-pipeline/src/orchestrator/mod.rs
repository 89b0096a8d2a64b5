//! Orchestrator module for the sync pipeline.
//!
//! Coordinates the provisioner, extractor, and loader components across every
//! configured data source.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::SyncError;
use crate::extractor::DocumentExtractor;
use crate::loader::{BulkLoader, LoadOutcome};
use crate::provisioner::{IndexProvisioner, ProvisionOutcome};
use crate::source::SourceSpec;
use search_sync_repository::SearchEngineClient;
use search_sync_shared::{DocumentRecord, SyncOptions};

/// Default cap on concurrent per-source work and bulk loads.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of data sources processed, and bulk loads in flight,
    /// at the same time.
    pub max_concurrency: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// What happened to one data source during a sync run.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub index: String,
    pub provisioning: Result<ProvisionOutcome, SyncError>,
    /// Number of documents extracted.
    pub extraction: Result<usize, SyncError>,
}

/// Outcome of one sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One entry per data source, in configuration order.
    pub sources: Vec<SourceReport>,
    /// One entry per bulk request, ordered by index name.
    pub loads: Vec<LoadOutcome>,
}

impl SyncReport {
    /// Whether every data source was extracted.
    ///
    /// Provisioning and load outcomes are reported but do not make a run
    /// unsuccessful.
    pub fn is_success(&self) -> bool {
        self.sources.iter().all(|s| s.extraction.is_ok())
    }

    /// Indices created during this run.
    pub fn created_indices(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| matches!(s.provisioning, Ok(ProvisionOutcome::Created)))
            .map(|s| s.index.as_str())
            .collect()
    }

    /// Bulk loads that were rejected or had failing items.
    pub fn failed_loads(&self) -> Vec<&LoadOutcome> {
        self.loads.iter().filter(|l| !l.is_success()).collect()
    }

    /// Total number of documents submitted for loading.
    pub fn documents_dispatched(&self) -> usize {
        self.loads.iter().map(|l| l.documents).sum()
    }
}

/// Orchestrator that synchronizes every data source with the search engine.
///
/// A run:
/// - Takes one snapshot of the live indices
/// - Provisions and extracts each data source concurrently
/// - Groups documents by index and issues one bulk load per index
/// - Collects every outcome into a [`SyncReport`]
pub struct SyncOrchestrator {
    engine: Arc<dyn SearchEngineClient>,
    sources: Vec<SourceSpec>,
    provisioner: IndexProvisioner,
    extractor: DocumentExtractor,
    loader: BulkLoader,
    config: OrchestratorConfig,
}

impl SyncOrchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(
        engine: Arc<dyn SearchEngineClient>,
        sources: Vec<SourceSpec>,
        global_exclusions: Vec<String>,
    ) -> Self {
        Self::with_config(engine, sources, global_exclusions, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        engine: Arc<dyn SearchEngineClient>,
        sources: Vec<SourceSpec>,
        global_exclusions: Vec<String>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provisioner: IndexProvisioner::new(engine.clone()),
            extractor: DocumentExtractor::new(global_exclusions),
            loader: BulkLoader::new(engine.clone()),
            engine,
            sources,
            config,
        }
    }

    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    /// Run one sync.
    ///
    /// Only a failed snapshot aborts the run. Every other failure is confined
    /// to its data source or index and recorded in the report.
    #[instrument(skip(self, options), fields(sources = self.sources.len(), refresh = options.refresh))]
    pub async fn run(&self, options: SyncOptions) -> Result<SyncReport, SyncError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(run_id = %run_id, "Starting sync run");

        let existing: HashSet<String> = self
            .engine
            .list_indices()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to read live indices");
                SyncError::SnapshotError(e)
            })?
            .into_iter()
            .collect();

        let concurrency = self.config.max_concurrency.max(1);

        let mut processed: Vec<(usize, SourceReport, Vec<DocumentRecord>)> =
            stream::iter(self.sources.iter().enumerate())
                .map(|(position, source)| {
                    let existing = &existing;
                    async move {
                        let (provisioning, extraction) = futures::join!(
                            self.provisioner.ensure_index(source, existing),
                            self.extractor.extract(source)
                        );
                        let (extraction, documents) = match extraction {
                            Ok(documents) => (Ok(documents.len()), documents),
                            Err(e) => (Err(e), Vec::new()),
                        };
                        let report = SourceReport {
                            source: source.name().to_string(),
                            index: source.index().to_string(),
                            provisioning,
                            extraction,
                        };
                        (position, report, documents)
                    }
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;
        processed.sort_by_key(|(position, _, _)| *position);

        let mut grouped: BTreeMap<String, Vec<DocumentRecord>> = BTreeMap::new();
        let mut sources = Vec::with_capacity(processed.len());
        for (_, report, documents) in processed {
            for document in documents {
                grouped
                    .entry(document.index().to_string())
                    .or_default()
                    .push(document);
            }
            sources.push(report);
        }

        let refresh = options.refresh;
        let mut loads: Vec<LoadOutcome> = stream::iter(grouped)
            .map(|(index, documents)| self.loader.load(index, documents, refresh))
            .buffer_unordered(concurrency)
            .collect()
            .await;
        loads.sort_by(|a, b| a.index.cmp(&b.index));

        let report = SyncReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            sources,
            loads,
        };

        for failed in report.sources.iter().filter(|s| s.extraction.is_err()) {
            warn!(data_source = %failed.source, "Data source was not synchronized");
        }
        info!(
            run_id = %run_id,
            created = report.created_indices().len(),
            documents = report.documents_dispatched(),
            failed_loads = report.failed_loads().len(),
            success = report.is_success(),
            "Sync run finished"
        );

        Ok(report)
    }
}
