//! Relational records and the documents built from them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One materialized relational row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    values: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    /// Build a record from a JSON object, reading the identifier from
    /// `id_field`.
    ///
    /// Returns `None` if the value is not an object or the identifier is
    /// missing or not a string/number.
    pub fn from_json(value: Value, id_field: &str) -> Option<Self> {
        let values = match value {
            Value::Object(map) => map,
            _ => return None,
        };
        let id = match values.get(id_field)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self { id, values })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Plain-data projection of the record, associations included.
    pub fn into_json(self) -> Value {
        Value::Object(self.values)
    }
}

/// Routing part of a bulk `index` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAction {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// A document ready to be bulk loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub action: BulkAction,
    pub body: Value,
}

impl DocumentRecord {
    pub fn new(index: impl Into<String>, record: Record) -> Self {
        Self {
            action: BulkAction {
                index: index.into(),
                id: record.id().to_string(),
            },
            body: record.into_json(),
        }
    }

    pub fn index(&self) -> &str {
        &self.action.index
    }

    /// The action line of the bulk request.
    pub fn action_line(&self) -> Value {
        json!({
            "index": {
                "_index": self.action.index,
                "_id": self.action.id
            }
        })
    }

    /// The action and document lines, in bulk request order.
    pub fn into_bulk_lines(self) -> [Value; 2] {
        let action = self.action_line();
        [action, self.body]
    }
}
