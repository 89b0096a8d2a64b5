//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use std::future::Future;

use async_trait::async_trait;
use opensearch::{
    cat::CatIndicesParts,
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    BulkParts, MsearchParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::types::BulkSummary;

/// Prefix of hidden and system indices, which are never listed.
pub const HIDDEN_INDEX_PREFIX: &str = ".";

/// OpenSearch client implementation.
///
/// Requests that fail before a response is received (connection refused,
/// timeouts) are retried with exponential backoff up to
/// `ConnectionConfig::max_retries` times. Error responses are never retried.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new(ConnectionConfig::new("http://localhost:9200"))?;
/// let indices = client.list_indices().await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    config: ConnectionConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the configured URL.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: ConnectionConfig) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            max_retries = config.max_retries,
            timeout_ms = config.request_timeout.as_millis() as u64,
            "Created OpenSearch client"
        );

        Ok(Self { client, config })
    }

    /// Send a request, retrying transport failures.
    ///
    /// `send` is called once per attempt and must build a fresh request.
    async fn send_with_retry<F, Fut>(&self, operation: &str, mut send: F) -> Result<Response, SearchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Response, opensearch::Error>>,
    {
        let mut attempt = 0;
        loop {
            match send().await {
                Ok(response) => {
                    if attempt > 0 {
                        info!(operation, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let error = Self::transport_error(operation, &e);
                    if !error.is_retryable() || attempt >= self.config.max_retries {
                        error!(operation, attempts = attempt + 1, error = %e, "Request failed");
                        return Err(error);
                    }
                    let delay = self.config.retry_delay(attempt);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Classify a request that produced no usable response.
    ///
    /// Errors carrying an HTTP status came back from the engine and are not
    /// retried. Everything else (refused connections, timeouts) is.
    fn transport_error(operation: &str, e: &opensearch::Error) -> SearchError {
        match e.status_code() {
            Some(status) => SearchError::query(format!("{} failed with status {}: {}", operation, status, e)),
            None => SearchError::connection(e.to_string()),
        }
    }

    /// Read a successful response body as JSON, turning error statuses into
    /// query errors carrying the engine's error body.
    async fn read_query_response(operation: &str, response: Response) -> Result<Value, SearchError> {
        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "{} request failed", operation);
            return Err(SearchError::query_response(
                format!("{} failed with status {}", operation, status),
                &error_body,
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    fn json_lines(lines: Vec<Value>) -> Vec<JsonBody<Value>> {
        lines.into_iter().map(JsonBody::new).collect()
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self))]
    async fn list_indices(&self) -> Result<Vec<String>, SearchError> {
        let response = self
            .send_with_retry("cat indices", || async {
                self.client
                    .cat()
                    .indices(CatIndicesParts::None)
                    .format("json")
                    .send()
                    .await
            })
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::connection(format!(
                "Listing indices failed with status {}: {}",
                status, error_body
            )));
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let mut names: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get("index").and_then(Value::as_str))
            .filter(|name| !name.starts_with(HIDDEN_INDEX_PREFIX))
            .map(str::to_string)
            .collect();
        names.sort();

        debug!(count = names.len(), "Listed indices");
        Ok(names)
    }

    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let indices = [index];
        let response = self
            .send_with_retry("index exists", || async {
                self.client
                    .indices()
                    .exists(IndicesExistsParts::Index(&indices))
                    .send()
                    .await
            })
            .await?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchError::connection(format!(
                "Index existence check returned status {}",
                status
            ))),
        }
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchError> {
        let response = self
            .send_with_retry("create index", || async {
                self.client
                    .indices()
                    .create(IndicesCreateParts::Index(index))
                    .body(body.clone())
                    .send()
                    .await
            })
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Index creation failed");
            return Err(SearchError::index_creation(format!(
                "Failed to create index {} (status {}): {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn bulk(&self, lines: Vec<Value>, refresh: bool) -> Result<BulkSummary, SearchError> {
        let response = self
            .send_with_retry("bulk", || {
                let request = self
                    .client
                    .bulk(BulkParts::None)
                    .body(Self::json_lines(lines.clone()));
                let request = if refresh {
                    request.refresh(Refresh::True)
                } else {
                    request
                };
                request.send()
            })
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let summary = BulkSummary::from_response(&body);
        if summary.has_failures() {
            warn!(
                total = summary.total,
                failed = summary.failed,
                "Bulk request completed with item failures"
            );
        } else {
            debug!(total = summary.total, "Bulk request completed");
        }
        Ok(summary)
    }

    #[instrument(skip(self, body))]
    async fn search(&self, indices: &[String], body: Value) -> Result<Value, SearchError> {
        let index_refs: Vec<&str> = indices.iter().map(String::as_str).collect();
        let response = self
            .send_with_retry("search", || {
                self.client
                    .search(SearchParts::Index(&index_refs))
                    .body(body.clone())
                    .send()
            })
            .await?;

        Self::read_query_response("Search", response).await
    }

    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn msearch(&self, lines: Vec<Value>) -> Result<Value, SearchError> {
        let response = self
            .send_with_retry("msearch", || {
                self.client
                    .msearch(MsearchParts::None)
                    .body(Self::json_lines(lines.clone()))
                    .send()
            })
            .await?;

        Self::read_query_response("Multi-search", response).await
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .send_with_retry("cluster health", || async {
                self.client
                    .cluster()
                    .health(ClusterHealthParts::None)
                    .send()
                    .await
            })
            .await?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let healthy = matches!(body["status"].as_str(), Some("green") | Some("yellow"));
        debug!(status = ?body["status"], healthy, "Cluster health checked");
        Ok(healthy)
    }
}
