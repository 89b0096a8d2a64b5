//! Configuration types for the search engine connection.

use std::time::Duration;

/// Default search engine URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Default number of retries for requests that fail at the transport level.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the search engine connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Search engine URL (e.g., "http://localhost:9200").
    pub url: String,
    /// Maximum number of retries when a request cannot reach the engine.
    pub max_retries: u32,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Delay before the first retry. Doubled after every attempt.
    pub initial_retry_delay: Duration,
    /// Upper bound for the retry delay.
    pub max_retry_delay: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            initial_retry_delay: Duration::from_millis(100),
            max_retry_delay: Duration::from_secs(5),
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given URL with default retry and timeout settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the maximum number of transport retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Delay to wait before retry number `attempt` (zero based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        std::cmp::min(
            self.initial_retry_delay.saturating_mul(factor),
            self.max_retry_delay,
        )
    }
}
