// src/crawl/walker.rs
// =============================================================================
// This module implements the concurrent crawl engine.
//
// How it works:
// 1. Check that the root really is a site root (https://host/, nothing else)
// 2. Fetch the root page ourselves, before any workers exist
// 3. Seed the frontier with the root's links
// 4. Start N workers. Each one repeatedly:
//    - takes a candidate URL from the frontier
//    - drops it if the policy says no, or if another worker already claimed it
//    - fetches it, records the outcome, and pushes the links it found
// 5. When the frontier is drained and no worker is mid-fetch, we're done
//
// A URL is fetched at most once because claiming it in the result store is a
// single atomic insert-if-absent. That's also why cycles and self-links stop
// on their own: the second time a URL comes around, the claim fails.
//
// Links are pushed unfiltered; the policy is checked when a candidate is
// taken, not when it's discovered.
//
// Rust concepts:
// - Arc: shared ownership of the state every worker task needs
// - JoinSet: each worker is a task; dropping the set aborts them all
// - Trait objects: the fetcher and policy are chosen by the caller
// =============================================================================

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::frontier::Frontier;
use super::policy::{CrawlPolicy, WhitelistDomainPolicy};
use super::results::{ClaimMap, CrawlResult, PageOutcome};
use crate::config::WalkerConfig;
use crate::error::WalkError;
use crate::extract::extract_links;
use crate::fetch::{HttpFetcher, PageFetcher};

/// Crawls a site with a pool of concurrent workers.
///
/// ```no_run
/// # async fn demo() -> Result<(), site_walker::WalkError> {
/// use site_walker::{Walker, WalkerConfig};
///
/// let walker = Walker::http(WalkerConfig::default().with_parallelism(8))?;
/// let result = walker.crawl("https://example.com/").await?;
/// for (page, outcome) in result.iter() {
///     println!("{page}: {outcome:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Walker {
    fetcher: Arc<dyn PageFetcher>,
    config: WalkerConfig,
    cancel: CancellationToken,
}

// Everything the worker tasks share
struct Shared {
    fetcher: Arc<dyn PageFetcher>,
    policy: Arc<dyn CrawlPolicy>,
    results: ClaimMap,
    frontier: Frontier,
}

impl Walker {
    /// A walker with the default configuration.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_config(fetcher, WalkerConfig::default())
    }

    pub fn with_config(fetcher: Arc<dyn PageFetcher>, config: WalkerConfig) -> Self {
        Self {
            fetcher,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// A walker that fetches over HTTP, sized by `config`.
    pub fn http(config: WalkerConfig) -> Result<Self, WalkError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_config(Arc::new(fetcher), config))
    }

    /// Stops crawls when `token` is cancelled. Workers finish the page they
    /// are on and the crawl returns what it has so far.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Crawls everything under `root`, following only links on the same
    /// scheme, host and port.
    pub async fn crawl(&self, root: &str) -> Result<CrawlResult, WalkError> {
        let root_url = parse_root(root)?;
        let policy = WhitelistDomainPolicy::new([root_url.as_str()])?;
        self.crawl_root(root_url, Arc::new(policy)).await
    }

    /// Crawls from `root`, following whatever `policy` accepts. The root page
    /// itself is always fetched.
    pub async fn crawl_with_policy(
        &self,
        root: &str,
        policy: Arc<dyn CrawlPolicy>,
    ) -> Result<CrawlResult, WalkError> {
        let root_url = parse_root(root)?;
        self.crawl_root(root_url, policy).await
    }

    async fn crawl_root(
        &self,
        root: Url,
        policy: Arc<dyn CrawlPolicy>,
    ) -> Result<CrawlResult, WalkError> {
        let parallelism = self.config.parallelism;
        if parallelism == 0 {
            return Err(WalkError::ZeroParallelism);
        }

        let root = String::from(root);
        tracing::info!(root = %root, parallelism, "Starting crawl");

        // A child token so a deadline only ends this crawl. Dropping this
        // future (e.g. under a timeout) cancels it too.
        let cancel = self.cancel.child_token();
        let _cancel_on_drop = cancel.clone().drop_guard();

        // Aborted when dropped, whichever way we leave this function
        let mut timer = JoinSet::new();
        if let Some(after) = self.config.deadline {
            let cancel = cancel.clone();
            timer.spawn(async move {
                tokio::time::sleep(after).await;
                tracing::warn!(?after, "Crawl deadline reached");
                cancel.cancel();
            });
        }

        let results = ClaimMap::new();
        results.claim(&root);

        // The root is done before any worker exists, so nothing can race it
        let outcome = visit(self.fetcher.as_ref(), &root).await;
        let seed = outcome.links().map(<[String]>::to_vec).unwrap_or_default();
        results.finalize(&root, outcome);

        // Nothing to follow, so no workers are needed
        if seed.is_empty() {
            return finish(&results);
        }

        let shared = Arc::new(Shared {
            fetcher: Arc::clone(&self.fetcher),
            policy,
            results,
            frontier: Frontier::new(seed, cancel.clone()),
        });

        // The set aborts any worker still running when it is dropped
        let mut workers = JoinSet::new();
        for id in 0..parallelism {
            workers.spawn(run_worker(id, Arc::clone(&shared)));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(error) = joined {
                tracing::warn!(%error, "Worker failed, stopping crawl");
                cancel.cancel();
                return Err(WalkError::Worker(error));
            }
        }

        finish(&shared.results)
    }
}

/// Crawls `root` over HTTP with `parallelism` workers.
///
/// With no policy, only pages under the root are followed.
pub async fn crawl(
    root: &str,
    parallelism: usize,
    policy: Option<Arc<dyn CrawlPolicy>>,
) -> Result<CrawlResult, WalkError> {
    let walker = Walker::http(WalkerConfig::default().with_parallelism(parallelism))?;
    match policy {
        Some(policy) => walker.crawl_with_policy(root, policy).await,
        None => walker.crawl(root).await,
    }
}

fn finish(results: &ClaimMap) -> Result<CrawlResult, WalkError> {
    let result = results.to_result()?;
    tracing::info!(
        pages = result.pages(),
        links = result.links_found(),
        failed = result.pages_failed(),
        "Crawl completed"
    );
    Ok(result)
}

async fn run_worker(id: usize, shared: Arc<Shared>) {
    tracing::debug!(worker = id, "Worker started");
    let mut visited = 0usize;

    while let Some(ticket) = shared.frontier.next().await {
        let url = ticket.url();

        // Dropping the ticket hands the slot back without new links
        if !shared.policy.accept(url) {
            tracing::debug!(worker = id, url, "Rejected by policy");
            continue;
        }
        if !shared.results.claim(url) {
            continue;
        }

        tracing::debug!(worker = id, url, "Claimed page");
        let outcome = visit(shared.fetcher.as_ref(), url).await;
        let links = outcome.links().map(<[String]>::to_vec).unwrap_or_default();

        // Finalize first: once the ticket settles the crawl may end
        shared.results.finalize(url, outcome);
        ticket.complete(links);
        visited += 1;
    }

    tracing::debug!(worker = id, visited, "Worker finished");
}

// Fetches `url` and extracts its links. Any failure at all becomes Failed.
async fn visit(fetcher: &dyn PageFetcher, url: &str) -> PageOutcome {
    let page_url = match Url::parse(url) {
        Ok(page_url) => page_url,
        Err(error) => {
            tracing::warn!(url, %error, "Not a fetchable URL");
            return PageOutcome::Failed;
        }
    };

    match fetcher.fetch(url).await {
        Ok(html) => PageOutcome::Fetched(extract_links(&page_url, &html)),
        Err(error) => {
            tracing::warn!(url, %error, "Failed to fetch page");
            PageOutcome::Failed
        }
    }
}

// A root is an absolute URL with a host, path "/" and nothing after it.
// "http://foo.bar" is fine too: the parser gives it the "/" path.
fn parse_root(root: &str) -> Result<Url, WalkError> {
    let invalid = |reason: String| WalkError::InvalidRoot {
        url: root.to_string(),
        reason,
    };

    let url = Url::parse(root).map_err(|e| invalid(e.to_string()))?;

    if url.cannot_be_a_base() || !url.has_host() {
        return Err(invalid("must be an absolute URL with a host".to_string()));
    }
    if url.path() != "/" {
        return Err(invalid(format!("path must be '/', not '{}'", url.path())));
    }
    if url.query().is_some() {
        return Err(invalid("must not have a query".to_string()));
    }
    if url.fragment().is_some() {
        return Err(invalid("must not have a fragment".to_string()));
    }

    Ok(url)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why fetch the root outside the pool?
//    - Nothing else exists yet, so there's nobody to race with
//    - If the root fails or has no links we return without spawning anything
//
// 2. Why Arc<Shared> instead of passing references?
//    - tokio::spawn needs 'static futures; a task might outlive the caller
//    - Arc keeps the fetcher, policy, results and frontier alive for as long
//      as any worker holds a clone
//
// 3. Why finalize before completing the ticket?
//    - Completing the ticket may be the event that ends the crawl
//    - If we finalized afterwards, the caller could snapshot a Pending entry
//
// 4. Why a JoinSet instead of a Vec of JoinHandles?
//    - join_next() hands back workers as they finish, so the first panic
//      (a JoinError) is seen immediately and the rest can be told to stop
//    - Dropping a JoinSet aborts everything still in it; a bare JoinHandle
//      just detaches the task
// -----------------------------------------------------------------------------
