//! Configuration and dependency wiring for the synchronizer.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    Settings, ENV_LOG_FORMAT, ENV_MAX_CONCURRENCY, ENV_MAX_RETRIES, ENV_REQUEST_TIMEOUT_MS,
    ENV_SEARCH_SERVICE_URL,
};
