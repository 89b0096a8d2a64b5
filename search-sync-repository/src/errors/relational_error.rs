//! Relational store error types.

use thiserror::Error;

/// Errors raised by a relational model while reading records.
#[derive(Debug, Clone, Error)]
pub enum RelationalError {
    /// The read query failed.
    #[error("Query on {model} failed: {message}")]
    QueryFailed { model: String, message: String },

    /// A row could not be turned into a record (e.g. missing identifier).
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl RelationalError {
    /// Create a query failure for the given model.
    pub fn query_failed(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryFailed {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create an invalid record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
