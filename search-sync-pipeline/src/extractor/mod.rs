//! Extractor module for the sync pipeline.
//!
//! Reads every record of a data source and turns each one into a document
//! routed to the data source's index.

use futures::TryStreamExt;
use tracing::{debug, error, instrument};

use crate::errors::SyncError;
use crate::source::SourceSpec;
use search_sync_shared::{DocumentRecord, FindOptions, Projection};

/// Extractor that reads relational records into documents.
///
/// The extractor is responsible for:
/// - Resolving the effective projection of a data source
/// - Reading every record, associations embedded, bypassing default scopes
/// - Routing each record to the data source's index by its identifier
pub struct DocumentExtractor {
    global_exclusions: Vec<String>,
}

impl DocumentExtractor {
    /// Create a new extractor applying `global_exclusions` to every data
    /// source without its own projection.
    pub fn new(global_exclusions: Vec<String>) -> Self {
        Self { global_exclusions }
    }

    /// The projection used to read `source`.
    ///
    /// The source's own projection wins; otherwise the global exclusions
    /// apply. With neither, every field is read.
    pub fn effective_projection(&self, source: &SourceSpec) -> Option<Projection> {
        match source.projection() {
            Some(projection) => Some(projection.clone()),
            None if self.global_exclusions.is_empty() => None,
            None => Some(Projection::Exclude(self.global_exclusions.clone())),
        }
    }

    /// Read every record of `source` into documents.
    ///
    /// The record stream is drained once. A failure anywhere in the stream
    /// fails the whole extraction of this source; documents read before the
    /// failure are discarded.
    #[instrument(skip(self, source), fields(data_source = %source.name(), index = %source.index()))]
    pub async fn extract(&self, source: &SourceSpec) -> Result<Vec<DocumentRecord>, SyncError> {
        let options = FindOptions {
            projection: self.effective_projection(source),
            include: source.include().to_vec(),
            unscoped: true,
        };

        let index = source.index();
        let documents: Vec<DocumentRecord> = source
            .model()
            .find_all(options)
            .map_ok(|record| DocumentRecord::new(index, record))
            .try_collect()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to extract records");
                SyncError::extraction(source.name(), e)
            })?;

        debug!(count = documents.len(), "Extracted documents");
        Ok(documents)
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
