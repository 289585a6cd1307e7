// src/error.rs
// =============================================================================
// Error types for the library.
//
// Two layers:
// - WalkError: stops the whole crawl (bad configuration, broken workers)
// - FetchError: one page could not be loaded; the engine records it as
//   PageOutcome::Failed and keeps going
//
// The binary wraps these in anyhow, the library keeps them typed with
// thiserror so callers can match on them.
// =============================================================================

use thiserror::Error;

/// Errors that abort a crawl before or while it runs.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root URL is not a site root like `https://example.com/`
    #[error("invalid root url '{url}': {reason}")]
    InvalidRoot { url: String, reason: String },

    /// A whitelist root could not be parsed as an absolute URL
    #[error("invalid policy root '{url}': {source}")]
    InvalidPolicyRoot {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The worker pool must have at least one worker
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A worker task panicked or was aborted
    #[error("crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    /// A claimed page was never given a final outcome
    #[error("page '{0}' was claimed but never finalized")]
    Unfinalized(String),
}

/// Errors from fetching a single page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, TLS, timeout or body decoding failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The fetcher has no content for this URL
    #[error("no content for {0}")]
    NotFound(String),
}
