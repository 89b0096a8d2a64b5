//! Error types for the sync pipeline.

use search_sync_repository::{RelationalError, SearchError};
use thiserror::Error;

/// Errors that can occur while synchronizing data sources.
///
/// Only `SnapshotError` aborts a sync run. Provisioning, extraction and load
/// errors are confined to the data source or index they happened on.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// The live index list could not be read.
    #[error("Snapshot error: {0}")]
    SnapshotError(SearchError),

    /// Creating the index of a data source failed.
    #[error("Provisioning error for index {index}: {source}")]
    ProvisioningError { index: String, source: SearchError },

    /// Reading the records of a data source failed.
    #[error("Extraction error for {data_source}: {source}")]
    ExtractionError {
        data_source: String,
        source: RelationalError,
    },

    /// A bulk load was rejected.
    #[error("Load error for index {index}: {source}")]
    LoadError { index: String, source: SearchError },

    /// The data source configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SyncError {
    /// Create a provisioning error.
    pub fn provisioning(index: impl Into<String>, source: SearchError) -> Self {
        Self::ProvisioningError {
            index: index.into(),
            source,
        }
    }

    /// Create an extraction error.
    pub fn extraction(data_source: impl Into<String>, source: RelationalError) -> Self {
        Self::ExtractionError {
            data_source: data_source.into(),
            source,
        }
    }

    /// Create a load error.
    pub fn load(index: impl Into<String>, source: SearchError) -> Self {
        Self::LoadError {
            index: index.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
