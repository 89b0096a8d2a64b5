//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend, plus the OpenSearch-specific index
//! mapping and query body builders.

mod client;
pub mod index_config;
pub mod queries;

pub use client::OpenSearchClient;
