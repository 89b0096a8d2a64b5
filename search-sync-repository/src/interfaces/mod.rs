//! Interface definitions for the stores the synchronizer talks to.
//!
//! The search engine and the relational store are both abstracted behind
//! traits so that backends can be swapped and tests can inject mocks.

mod relational_model;
mod search_engine_client;

pub use relational_model::RelationalModel;
pub use search_engine_client::SearchEngineClient;
