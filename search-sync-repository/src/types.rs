//! Response types for search engine operations.

use serde_json::Value;

/// Failure of a single item within a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemFailure {
    /// Target index of the failed item.
    pub index: String,
    /// Document ID of the failed item.
    pub id: String,
    /// HTTP status reported for the item.
    pub status: u16,
    /// Engine reason, or the raw error object if it had no `reason`.
    pub reason: String,
}

/// Summary of a bulk request containing aggregate statistics and item failures.
///
/// A bulk request can be accepted by the engine while some of its items are
/// rejected; this summary lets callers handle such partial failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSummary {
    /// Total number of items in the request.
    pub total: usize,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Details of each failed item.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkSummary {
    /// Build a summary from a bulk response body.
    pub fn from_response(response: &Value) -> Self {
        let items = match response.get("items").and_then(Value::as_array) {
            Some(items) => items,
            None => return Self::default(),
        };

        let mut failures = Vec::new();
        for item in items {
            // Each item is keyed by its action type ("index", "create", ...)
            let Some(result) = item.as_object().and_then(|o| o.values().next()) else {
                continue;
            };
            let Some(error) = result.get("error") else {
                continue;
            };
            failures.push(BulkItemFailure {
                index: result["_index"].as_str().unwrap_or_default().to_string(),
                id: result["_id"].as_str().unwrap_or_default().to_string(),
                status: result["status"].as_u64().unwrap_or_default() as u16,
                reason: error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            });
        }

        let total = items.len();
        let failed = failures.len();
        Self {
            total,
            succeeded: total - failed,
            failed,
            failures,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
