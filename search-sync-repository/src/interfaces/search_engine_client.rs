//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::BulkSummary;

/// Abstract interface for search engine operations.
///
/// This trait defines the engine operations the synchronizer and query client
/// rely on. Implementations can be swapped for different backends (OpenSearch,
/// mock, etc.), which is how the pipeline is tested.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: a single client instance is
/// shared by every concurrent sync task and query.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>` for consistent error handling.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// List the names of every index in the engine's catalog. Hidden and
    /// system indices (names starting with `.`) are left out.
    async fn list_indices(&self) -> Result<Vec<String>, SearchError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create an index.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    /// * `body` - Creation body (`mappings`, `settings`, `aliases`)
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchError::IndexCreationError)` - If the engine refused, including
    ///   when the index already exists
    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchError>;

    /// Submit a bulk request.
    ///
    /// # Arguments
    ///
    /// * `lines` - Alternating action and document entries
    /// * `refresh` - Refresh the affected indices before returning
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-item statistics; individual item failures do not
    ///   make the call fail
    /// * `Err(SearchError::BulkIndexError)` - If the request was rejected as a whole
    async fn bulk(&self, lines: Vec<Value>, refresh: bool) -> Result<BulkSummary, SearchError>;

    /// Execute a search request against the given indices and return the raw
    /// engine response.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let body = json!({ "query": { "query_string": { "query": "dune" } } });
    /// let response = client.search(&["books".to_string()], body).await?;
    /// println!("{}", response["hits"]["total"]["value"]);
    /// ```
    async fn search(&self, indices: &[String], body: Value) -> Result<Value, SearchError>;

    /// Execute a multi-search request made of alternating header and body
    /// entries and return the raw engine response.
    async fn msearch(&self, lines: Vec<Value>) -> Result<Value, SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
