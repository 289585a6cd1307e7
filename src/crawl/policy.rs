// src/crawl/policy.rs
// =============================================================================
// Crawl policies decide which URLs the engine may fetch.
//
// A policy only gates what gets *followed*. The links recorded for a page are
// never filtered, so off-site links still show up in the results.
//
// Policies are called from every worker at once without locking, so they
// must not mutate anything.
// =============================================================================

use url::Url;

use crate::error::WalkError;

/// Decides whether the engine may fetch a URL.
pub trait CrawlPolicy: Send + Sync {
    fn accept(&self, url: &str) -> bool;
}

// Any plain predicate works as a policy
impl<F> CrawlPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, url: &str) -> bool {
        self(url)
    }
}

/// Rejects everything: only the root page is fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

impl CrawlPolicy for RejectAll {
    fn accept(&self, _url: &str) -> bool {
        false
    }
}

/// Accepts URLs that live under one of a set of root URLs.
///
/// A root is the "base of" a candidate when scheme, host and port match and
/// the candidate's path starts with the root's directory (its path up to the
/// last `/`). Hosts are compared whole, so `http://foo.bar/` does not accept
/// `http://foo.bar.evil.com/`.
///
/// Relative candidates are resolved against each root before comparing.
/// Candidates that cannot be resolved are rejected.
#[derive(Debug, Clone)]
pub struct WhitelistDomainPolicy {
    roots: Vec<Url>,
}

impl WhitelistDomainPolicy {
    /// Builds a policy from absolute root URLs.
    ///
    /// Fails if any root is not an absolute URL.
    pub fn new<I, S>(roots: I) -> Result<Self, WalkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roots = roots
            .into_iter()
            .map(|root| {
                let root = root.as_ref();
                Url::parse(root).map_err(|source| WalkError::InvalidPolicyRoot {
                    url: root.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[Url] {
        &self.roots
    }
}

impl CrawlPolicy for WhitelistDomainPolicy {
    fn accept(&self, url: &str) -> bool {
        self.roots.iter().any(|root| match root.join(url) {
            Ok(candidate) => is_base_of(root, &candidate),
            Err(_) => false,
        })
    }
}

fn is_base_of(root: &Url, candidate: &Url) -> bool {
    root.scheme() == candidate.scheme()
        && root.host_str() == candidate.host_str()
        && root.port_or_known_default() == candidate.port_or_known_default()
        && candidate.path().starts_with(directory_of(root.path()))
}

// "/baz/aca" -> "/baz/", "/" -> "/"
fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..=index],
        None => "",
    }
}
