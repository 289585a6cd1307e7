// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Everything has a sensible default so `WalkerConfig::default()` is enough
// for most callers. The CLI only overrides `parallelism`.
// =============================================================================

use std::time::Duration;

/// Default number of concurrent workers for library callers.
pub const DEFAULT_PARALLELISM: usize = 30;

/// Default per-request timeout for the HTTP fetcher.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by the crawl engine and the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// How many workers pull from the frontier at once. Also caps idle
    /// connections per host in the HTTP fetcher.
    pub parallelism: usize,
    /// Timeout for a single page request.
    pub request_timeout: Duration,
    /// Stop claiming new pages once this much time has passed.
    pub deadline: Option<Duration>,
    /// User-Agent header sent by the HTTP fetcher.
    pub user_agent: String,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            deadline: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl WalkerConfig {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WalkerConfig::default();
        assert_eq!(config.parallelism, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.deadline.is_none());
        assert!(config.user_agent.starts_with("site-walker/"));
    }

    #[test]
    fn test_builder_setters() {
        let config = WalkerConfig::default()
            .with_parallelism(4)
            .with_deadline(Duration::from_secs(1))
            .with_user_agent("site-walker-test");
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.deadline, Some(Duration::from_secs(1)));
        assert_eq!(config.user_agent, "site-walker-test");
    }
}
