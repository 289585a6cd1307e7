// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - One shared reqwest Client for every worker (connection pooling)
// - Idle connections per host scale with the crawl's parallelism
// - Non-2xx responses count as failures, just like network errors
// - The body is decoded with the charset the server announced
//
// No retries: a page that fails once is recorded as failed.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;

use super::PageFetcher;
use crate::config::WalkerConfig;
use crate::error::{FetchError, WalkError};

/// [`PageFetcher`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client from the timeout, user agent and parallelism in
    /// `config`.
    pub fn new(config: &WalkerConfig) -> Result<Self, WalkError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .pool_max_idle_per_host(config.parallelism)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(WalkError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // text() honours the charset in Content-Type
        let html = response.text().await?;
        Ok(html)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why one Client for everything?
//    - reqwest::Client holds a connection pool internally
//    - Cloning it is cheap (it's an Arc inside), building new ones is not
//
// 2. What does pool_max_idle_per_host do?
//    - Caps how many idle keep-alive connections are kept per host
//    - We crawl one site with N workers, so N is the natural limit
//
// 3. Why is a 404 an error here?
//    - The crawl only cares whether it got a page to read links from
//    - A 404 body is an error page, not the page that was linked
// -----------------------------------------------------------------------------
