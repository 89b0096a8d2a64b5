//! Provisioner module for the sync pipeline.
//!
//! Creates the index of a data source when it does not exist yet. Existing
//! indices are never touched, so their mappings are never altered.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::errors::SyncError;
use crate::source::SourceSpec;
use search_sync_repository::opensearch::index_config::{field_mappings, index_body};
use search_sync_repository::SearchEngineClient;

/// What provisioning did for one data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The index was in the snapshot; nothing was sent.
    AlreadyExists,
    /// The index was created.
    Created,
}

/// Provisioner that ensures data source indices exist.
pub struct IndexProvisioner {
    engine: Arc<dyn SearchEngineClient>,
}

impl IndexProvisioner {
    /// Create a new provisioner with the given engine client.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self { engine }
    }

    /// Ensure the index of `source` exists.
    ///
    /// `existing` is the live index snapshot taken at the start of the sync
    /// run. It is not re-checked: if the index appears after the snapshot was
    /// taken, the creation request fails and the failure is returned.
    #[instrument(skip(self, source, existing), fields(index = %source.index()))]
    pub async fn ensure_index(
        &self,
        source: &SourceSpec,
        existing: &HashSet<String>,
    ) -> Result<ProvisionOutcome, SyncError> {
        if existing.contains(source.index()) {
            debug!("Index already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        let properties = field_mappings(source.attributes());
        let field_count = properties.len();
        let body = index_body(properties, source.alias());

        match self.engine.create_index(source.index(), body).await {
            Ok(()) => {
                info!(
                    data_source = %source.name(),
                    fields = field_count,
                    "Provisioned index"
                );
                Ok(ProvisionOutcome::Created)
            }
            Err(e) => {
                error!(data_source = %source.name(), error = %e, "Failed to provision index");
                Err(SyncError::provisioning(source.index(), e))
            }
        }
    }
}
