//! Mock collaborators shared by the pipeline tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{Map, Value};

use search_sync_repository::{BulkSummary, RelationalError, RelationalModel, SearchEngineClient, SearchError};
use search_sync_shared::{AttributeSchema, FindOptions, Record};

/// In-memory relational model.
pub struct MockModel {
    name: String,
    attributes: AttributeSchema,
    rows: Vec<Value>,
    fail: bool,
    pub find_calls: Mutex<Vec<FindOptions>>,
}

impl MockModel {
    pub fn new(name: &str, attributes: AttributeSchema, rows: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            rows,
            fail: false,
            find_calls: Mutex::new(Vec::new()),
        }
    }

    /// A model whose reads fail after the first row.
    pub fn failing(name: &str, rows: Vec<Value>) -> Self {
        Self {
            fail: true,
            ..Self::new(name, AttributeSchema::new(), rows)
        }
    }
}

impl RelationalModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> AttributeSchema {
        self.attributes.clone()
    }

    fn find_all(&self, options: FindOptions) -> BoxStream<'_, Result<Record, RelationalError>> {
        self.find_calls.lock().unwrap().push(options.clone());

        let mut results: Vec<Result<Record, RelationalError>> = Vec::new();
        for row in &self.rows {
            let id = match &row["id"] {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => {
                    results.push(Err(RelationalError::invalid_record("row without id")));
                    continue;
                }
            };
            let values: Map<String, Value> = row
                .as_object()
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .filter(|(field, _)| {
                    options
                        .projection
                        .as_ref()
                        .map_or(true, |projection| projection.allows(field))
                })
                .collect();
            results.push(Ok(Record::new(id, values)));
            if self.fail {
                results.push(Err(RelationalError::query_failed(&self.name, "connection reset")));
                break;
            }
        }
        stream::iter(results).boxed()
    }
}

/// In-memory search engine recording every call.
#[derive(Default)]
pub struct MockEngine {
    pub indices: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(String, Value)>>,
    pub bulks: Mutex<Vec<(Vec<Value>, bool)>>,
    pub list_calls: AtomicUsize,
    pub fail_snapshot: bool,
    pub fail_create: HashSet<String>,
    pub fail_bulk: HashSet<String>,
}

impl MockEngine {
    pub fn with_indices(indices: &[&str]) -> Self {
        Self {
            indices: Mutex::new(indices.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn created_names(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl SearchEngineClient for MockEngine {
    async fn list_indices(&self) -> Result<Vec<String>, SearchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_snapshot {
            return Err(SearchError::connection("connection refused"));
        }
        Ok(self.indices.lock().unwrap().clone())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        Ok(self.indices.lock().unwrap().iter().any(|i| i == index))
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchError> {
        if self.fail_create.contains(index) {
            return Err(SearchError::index_creation(format!(
                "resource_already_exists_exception: {}",
                index
            )));
        }
        self.indices.lock().unwrap().push(index.to_string());
        self.created.lock().unwrap().push((index.to_string(), body));
        Ok(())
    }

    async fn bulk(&self, lines: Vec<Value>, refresh: bool) -> Result<BulkSummary, SearchError> {
        let index = lines
            .first()
            .and_then(|line| line["index"]["_index"].as_str())
            .unwrap_or_default()
            .to_string();
        if self.fail_bulk.contains(&index) {
            return Err(SearchError::bulk_index("status 413: request too large"));
        }
        let total = lines.len() / 2;
        self.bulks.lock().unwrap().push((lines, refresh));
        Ok(BulkSummary {
            total,
            succeeded: total,
            failed: 0,
            failures: Vec::new(),
        })
    }

    async fn search(&self, _indices: &[String], _body: Value) -> Result<Value, SearchError> {
        Ok(Value::Null)
    }

    async fn msearch(&self, _lines: Vec<Value>) -> Result<Value, SearchError> {
        Ok(Value::Null)
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}
