// src/fetch/mod.rs
// =============================================================================
// Where page content comes from.
//
// The engine only knows the PageFetcher trait. Two implementations ship:
// - http: the real thing, backed by reqwest
// - fixture: a fixed URL -> HTML mapping, used in tests and demos
//
// Rust concepts:
// - Traits: an interface the engine calls without knowing the concrete type
// - async-trait: async methods on a trait used behind `dyn`
// =============================================================================

mod fixture;
mod http;

use async_trait::async_trait;

use crate::error::FetchError;

pub use fixture::StaticFetcher;
pub use http::HttpFetcher;

/// Source of page content for the crawl engine.
///
/// Implementations must be safe to call from many workers at once.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of the page at `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
