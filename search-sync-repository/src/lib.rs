//! # Search Sync Repository
//!
//! This crate provides the interfaces of the two stores the synchronizer sits
//! between (the search engine and the relational store), a concrete
//! implementation of the search engine side for OpenSearch, and the query
//! client used by applications to search the synchronized indices.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::SearchClient;
pub use config::ConnectionConfig;
pub use errors::{RelationalError, SearchError};
pub use interfaces::{RelationalModel, SearchEngineClient};
pub use opensearch::OpenSearchClient;
pub use types::{BulkItemFailure, BulkSummary};
