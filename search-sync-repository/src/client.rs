//! Search client implementation.
//!
//! This module provides the query side of the synchronizer. Application code
//! uses it to search one scope, fan a query out over several indices, or send
//! a hand-built request.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::queries::{build_msearch_lines, build_search_body};
use search_sync_shared::{MultiSearchOptions, SearchOptions, SearchOutcome};

/// Scope matching every index.
pub const ALL_INDICES: &str = "*";

/// The main client for querying the synchronized indices.
///
/// The client holds no state besides the shared engine connection; every call
/// is a function of its arguments.
#[derive(Clone)]
pub struct SearchClient {
    engine: Arc<dyn SearchEngineClient>,
}

impl SearchClient {
    /// Create a new SearchClient over the given engine connection.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self { engine }
    }

    /// Split a comma separated scope into index names. An empty scope means
    /// every index.
    fn parse_scope(scope: &str) -> Vec<String> {
        let indices: Vec<String> = scope
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if indices.is_empty() {
            vec![ALL_INDICES.to_string()]
        } else {
            indices
        }
    }

    /// Query-string search over `scope` (an index name, a comma separated
    /// list, or `*`).
    ///
    /// An empty (or blank) query returns an empty outcome without contacting
    /// the engine. The outcome is the hit array unless
    /// `options.whole_response` is set.
    #[instrument(skip(self, options))]
    pub async fn search(
        &self,
        query: &str,
        scope: &str,
        options: &SearchOptions,
    ) -> Result<SearchOutcome, SearchError> {
        if query.trim().is_empty() {
            debug!("Empty query, skipping search");
            return Ok(SearchOutcome::empty(options.whole_response));
        }

        let indices = Self::parse_scope(scope);
        let body = build_search_body(query, options);
        let response = self.engine.search(&indices, body).await?;

        Ok(SearchOutcome::from_response(response, options.whole_response))
    }

    /// Send a caller-built search request.
    ///
    /// `params` may carry `index` (a string or an array of strings) and
    /// `body`. If it has neither, the whole object is used as the body and
    /// every index is searched. Any other key (`from`, `size`, `sort`, ...)
    /// is merged into the body, taking precedence over the body's own value.
    #[instrument(skip(self, params))]
    pub async fn custom_search(&self, params: Value) -> Result<Value, SearchError> {
        let Value::Object(mut params) = params else {
            return Err(SearchError::invalid_query("search parameters must be an object"));
        };

        let indices = match params.remove("index") {
            None => vec![ALL_INDICES.to_string()],
            Some(Value::String(scope)) => Self::parse_scope(&scope),
            Some(Value::Array(items)) => {
                let names: Option<Vec<String>> = items
                    .into_iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                names.ok_or_else(|| SearchError::invalid_query("index names must be strings"))?
            }
            Some(_) => return Err(SearchError::invalid_query("index must be a string or an array")),
        };

        let body = match params.remove("body") {
            None => Value::Object(params),
            Some(body) if params.is_empty() => body,
            Some(Value::Object(mut body)) => {
                body.extend(params);
                Value::Object(body)
            }
            Some(_) => {
                return Err(SearchError::invalid_query(
                    "body must be an object when other search parameters are given",
                ))
            }
        };

        self.engine.search(&indices, body).await
    }

    /// Fan a query out over several indices with a single multi-search.
    ///
    /// With an explicit index list, names that are not live indices are
    /// dropped silently. Without one, every live index is searched.
    #[instrument(skip(self, options))]
    pub async fn search_in_indices(
        &self,
        query: &str,
        options: &MultiSearchOptions,
    ) -> Result<Value, SearchError> {
        if query.trim().is_empty() {
            debug!("Empty query, skipping multi-search");
            return Ok(json!({ "responses": [] }));
        }

        let live = self.all_indices().await?;
        let indices: Vec<String> = match &options.indices {
            Some(requested) => requested
                .iter()
                .filter(|name| live.contains(name))
                .cloned()
                .collect(),
            None => live,
        };

        if indices.is_empty() {
            debug!("No live index matched, skipping multi-search");
            return Ok(json!({ "responses": [] }));
        }

        debug!(index_count = indices.len(), "Dispatching multi-search");
        let lines = build_msearch_lines(query, &indices, options);
        self.engine.msearch(lines).await
    }

    /// Names of every live index, sorted.
    pub async fn all_indices(&self) -> Result<Vec<String>, SearchError> {
        let mut indices = self.engine.list_indices().await?;
        indices.sort();
        Ok(indices)
    }

    /// Check whether an index exists.
    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        self.engine.index_exists(index).await
    }
}
