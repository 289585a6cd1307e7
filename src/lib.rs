// src/lib.rs
// =============================================================================
// site-walker: crawl a site from its root and map every page to its links.
//
// Modules:
// - crawl: the concurrent engine, policies and results
// - extract: href normalization and link extraction
// - fetch: where page content comes from (HTTP or a fixed map)
// - config: crawl settings
// - error: typed errors
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;

pub use config::WalkerConfig;
pub use crawl::{crawl, CrawlPolicy, CrawlResult, PageOutcome, RejectAll, Walker, WhitelistDomainPolicy};
pub use error::{FetchError, WalkError};
pub use fetch::{HttpFetcher, PageFetcher, StaticFetcher};
