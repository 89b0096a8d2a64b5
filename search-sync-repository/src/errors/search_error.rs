//! Search error types.
//!
//! This module defines the error types that can occur during search engine operations.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine rejected a search or multi-search request.
    ///
    /// `body` carries the engine's structured error object when the response
    /// had one.
    #[error("Query error: {message}")]
    QueryError {
        message: String,
        body: Option<Value>,
    },

    /// Failed to create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Bulk indexing request was rejected as a whole.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to parse response from search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The provided query is invalid.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error without an engine error body.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError {
            message: msg.into(),
            body: None,
        }
    }

    /// Create a query error from a failed engine response.
    ///
    /// If the raw response text is JSON, its `error` object (or the whole
    /// document if there is none) is kept as the structured body. Otherwise
    /// the raw text is appended to the message.
    pub fn query_response(msg: impl Into<String>, raw: &str) -> Self {
        let msg = msg.into();
        match serde_json::from_str::<Value>(raw) {
            Ok(mut parsed) => {
                let body = match parsed.get_mut("error") {
                    Some(error) => error.take(),
                    None => parsed,
                };
                Self::QueryError {
                    message: msg,
                    body: Some(body),
                }
            }
            Err(_) => Self::QueryError {
                message: format!("{}: {}", msg, raw),
                body: None,
            },
        }
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// The engine's structured error body, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::QueryError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether retrying the request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}
