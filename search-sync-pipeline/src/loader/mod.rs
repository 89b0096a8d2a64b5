//! Loader module for the sync pipeline.
//!
//! Loads the extracted documents of one index with a single bulk request.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::errors::SyncError;
use search_sync_repository::{BulkSummary, SearchEngineClient};
use search_sync_shared::DocumentRecord;

/// Result of loading the documents of one index.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Target index.
    pub index: String,
    /// Number of documents submitted.
    pub documents: usize,
    /// Engine summary, or the reason the request was rejected.
    pub result: Result<BulkSummary, SyncError>,
}

impl LoadOutcome {
    /// Whether the request was accepted and every item succeeded.
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(summary) if !summary.has_failures())
    }
}

/// Loader that bulk loads documents into the search engine.
///
/// Loads are not retried: a rejected request is logged and reported in the
/// returned outcome, never propagated.
pub struct BulkLoader {
    engine: Arc<dyn SearchEngineClient>,
}

impl BulkLoader {
    /// Create a new loader with the given engine client.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self { engine }
    }

    /// Load `documents` into `index` with one bulk request.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn load(&self, index: String, documents: Vec<DocumentRecord>, refresh: bool) -> LoadOutcome {
        let count = documents.len();
        let lines: Vec<_> = documents
            .into_iter()
            .flat_map(DocumentRecord::into_bulk_lines)
            .collect();

        let result = match self.engine.bulk(lines, refresh).await {
            Ok(summary) => {
                if summary.has_failures() {
                    warn!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Bulk load completed with failures"
                    );
                } else {
                    info!(count = count, "Bulk load completed");
                }
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, count = count, "Bulk load failed");
                Err(SyncError::load(index.clone(), e))
            }
        };

        LoadOutcome {
            index,
            documents: count,
            result,
        }
    }
}
