// src/fetch/fixture.rs
// =============================================================================
// A PageFetcher that serves fixed HTML for fixed URLs.
//
// It also keeps a log of how many times each URL was requested, which is how
// tests prove the engine never fetches a page twice.
// =============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use super::PageFetcher;
use crate::error::FetchError;

/// Serves pages from an in-memory map. Unknown URLs fail with
/// [`FetchError::NotFound`].
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    fetches: DashMap<String, usize>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the HTML served for `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// How many times `url` has been requested, including failed requests.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.get(url).map(|count| *count).unwrap_or(0)
    }

    /// Total number of requests across all URLs.
    pub fn total_fetches(&self) -> usize {
        self.fetches.iter().map(|entry| *entry.value()).sum()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        *self.fetches.entry(url.to_string()).or_insert(0) += 1;

        // Yield so that other workers get a chance to race us
        tokio::task::yield_now().await;

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
