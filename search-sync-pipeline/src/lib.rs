//! # Search Sync Pipeline
//!
//! This crate provides the components that mirror relational data sources
//! into search indices.
//!
//! ## Architecture
//!
//! A sync run follows the Provisioner-Extractor-Loader pattern:
//!
//! 1. **Provisioner**: Creates the index of each data source if it is missing
//! 2. **Extractor**: Reads every record of a data source into documents
//! 3. **Loader**: Bulk loads the documents of one index
//! 4. **Orchestrator**: Runs the above concurrently for every data source

pub mod errors;
pub mod extractor;
pub mod loader;
pub mod orchestrator;
pub mod provisioner;
pub mod source;

pub use errors::SyncError;
pub use extractor::DocumentExtractor;
pub use loader::{BulkLoader, LoadOutcome};
pub use orchestrator::{
    OrchestratorConfig, SourceReport, SyncOrchestrator, SyncReport, DEFAULT_MAX_CONCURRENCY,
};
pub use provisioner::{IndexProvisioner, ProvisionOutcome};
pub use source::{normalize_sources, DataSource, DataSourceDescriptor, SourceSpec};

#[cfg(test)]
mod testing;
