//! Settings read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use search_sync_pipeline::OrchestratorConfig;
use search_sync_repository::ConnectionConfig;

use crate::telemetry::LogFormat;
use crate::SearchSyncError;

/// Search engine URL.
pub const ENV_SEARCH_SERVICE_URL: &str = "SEARCH_SERVICE_URL";

/// Maximum number of transport retries per request.
pub const ENV_MAX_RETRIES: &str = "SEARCH_SYNC_MAX_RETRIES";

/// Request timeout, in milliseconds.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SEARCH_SYNC_REQUEST_TIMEOUT_MS";

/// Cap on concurrent per-source work and bulk loads.
pub const ENV_MAX_CONCURRENCY: &str = "SEARCH_SYNC_MAX_CONCURRENCY";

/// Log output format, `json` or `pretty`.
pub const ENV_LOG_FORMAT: &str = "SEARCH_SYNC_LOG_FORMAT";

/// Everything the synchronizer reads from its environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub orchestrator: OrchestratorConfig,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// A `.env` file in the working directory, if any, is loaded first.
    /// Unset variables fall back to their defaults.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_SERVICE_URL`: search engine URL (default: http://localhost:9200)
    /// - `SEARCH_SYNC_MAX_RETRIES`: transport retries per request (default: 5)
    /// - `SEARCH_SYNC_REQUEST_TIMEOUT_MS`: request timeout (default: 60000)
    /// - `SEARCH_SYNC_MAX_CONCURRENCY`: concurrent sources and loads (default: 8)
    /// - `SEARCH_SYNC_LOG_FORMAT`: `json` or `pretty` (default: pretty)
    pub fn from_env() -> Result<Self, SearchSyncError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable
    /// if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchSyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_SEARCH_SERVICE_URL) {
            settings.connection.url = url;
        }
        if let Some(retries) = parse(&lookup, ENV_MAX_RETRIES)? {
            settings.connection = settings.connection.with_max_retries(retries);
        }
        if let Some(timeout_ms) = parse::<u64, _>(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            settings.connection = settings
                .connection
                .with_request_timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(concurrency) = parse::<usize, _>(&lookup, ENV_MAX_CONCURRENCY)? {
            if concurrency == 0 {
                return Err(SearchSyncError::config(format!(
                    "{} must be at least 1",
                    ENV_MAX_CONCURRENCY
                )));
            }
            settings.orchestrator.max_concurrency = concurrency;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            settings.log_format = format.parse()?;
        }

        Ok(settings)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, SearchSyncError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| SearchSyncError::config(format!("invalid {} {:?}: {}", key, raw, e))),
    }
}
