// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - A fixed pool of concurrent workers sharing one frontier
// - Every URL fetched at most once, however many pages link to it
// - Pluggable policies deciding which URLs may be followed
// - Deadline and cancellation support, returning partial results
//
// Submodules:
// - walker: the engine and its worker loop
// - frontier: the shared work queue and its termination detection
// - results: the claim-once result store and the finished CrawlResult
// - policy: CrawlPolicy and the built-in policies
// =============================================================================

mod frontier;
mod policy;
mod results;
mod walker;

pub use policy::{CrawlPolicy, RejectAll, WhitelistDomainPolicy};
pub use results::{CrawlResult, PageOutcome};
pub use walker::{crawl, Walker};
