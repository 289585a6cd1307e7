// src/crawl/results.rs
// =============================================================================
// The result store: which pages have been claimed, and what happened to them.
//
// During a crawl every worker shares one `ClaimMap`. Claiming a URL is a
// single insert-if-absent on a DashMap; whoever gets the insert in first owns
// the page and is the only one who will ever finalize it.
//
//   absent --claim--> Pending --finalize--> Done(Fetched | Failed)
//
// When the crawl is over the map is copied into an immutable `CrawlResult`.
// =============================================================================

use std::collections::BTreeMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use crate::error::WalkError;

/// What happened when a page was visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "links", rename_all = "snake_case")]
pub enum PageOutcome {
    /// The page loaded; these are its links (possibly none).
    Fetched(Vec<String>),
    /// The page could not be fetched.
    Failed,
}

impl PageOutcome {
    /// The page's links, or `None` if it failed to load.
    pub fn links(&self) -> Option<&[String]> {
        match self {
            PageOutcome::Fetched(links) => Some(links),
            PageOutcome::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed)
    }
}

#[derive(Debug)]
enum Slot {
    Pending,
    Done(PageOutcome),
}

/// Concurrent claim-once store used while the crawl runs.
#[derive(Debug, Default)]
pub(crate) struct ClaimMap {
    slots: DashMap<String, Slot>,
}

impl ClaimMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserves `url` for the caller. Returns false if someone else already
    /// claimed it (or it is already finished).
    pub(crate) fn claim(&self, url: &str) -> bool {
        match self.slots.entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Slot::Pending);
                true
            }
        }
    }

    /// Records the outcome for a URL the caller claimed. An already finished
    /// entry is left untouched.
    pub(crate) fn finalize(&self, url: &str, outcome: PageOutcome) {
        match self.slots.get_mut(url) {
            Some(mut slot) if matches!(*slot, Slot::Pending) => *slot = Slot::Done(outcome),
            Some(_) => tracing::warn!(url, "ignoring second finalize for page"),
            None => tracing::warn!(url, "finalize for a page that was never claimed"),
        }
    }

    /// Copies the store out once the workers are done. Fails if any
    /// claimed page was never finalized.
    pub(crate) fn to_result(&self) -> Result<CrawlResult, WalkError> {
        let mut pages = BTreeMap::new();
        for entry in self.slots.iter() {
            match entry.value() {
                Slot::Done(outcome) => {
                    pages.insert(entry.key().clone(), outcome.clone());
                }
                Slot::Pending => return Err(WalkError::Unfinalized(entry.key().clone())),
            }
        }
        Ok(CrawlResult { pages })
    }
}

/// Every page the crawl visited, keyed by normalized URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrawlResult {
    pages: BTreeMap<String, PageOutcome>,
}

impl CrawlResult {
    pub fn get(&self, url: &str) -> Option<&PageOutcome> {
        self.pages.get(url)
    }

    /// Links found on `url`, or `None` if it failed or was never visited.
    pub fn links(&self, url: &str) -> Option<&[String]> {
        self.get(url).and_then(PageOutcome::links)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in URL order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageOutcome)> {
        self.pages.iter().map(|(url, outcome)| (url.as_str(), outcome))
    }

    pub fn pages(&self) -> usize {
        self.len()
    }

    /// Total links across all fetched pages (counted per page).
    pub fn links_found(&self) -> usize {
        self.pages
            .values()
            .filter_map(PageOutcome::links)
            .map(<[String]>::len)
            .sum()
    }

    pub fn pages_failed(&self) -> usize {
        self.pages.values().filter(|outcome| outcome.is_failed()).count()
    }
}

impl FromIterator<(String, PageOutcome)> for CrawlResult {
    fn from_iter<I: IntoIterator<Item = (String, PageOutcome)>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CrawlResult {
    type Item = (&'a String, &'a PageOutcome);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PageOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let map = ClaimMap::new();
        assert!(map.claim("http://foo.bar/"));
        assert!(!map.claim("http://foo.bar/"));
    }

    #[test]
    fn test_claim_after_finalize_fails() {
        let map = ClaimMap::new();
        assert!(map.claim("http://foo.bar/"));
        map.finalize("http://foo.bar/", PageOutcome::Failed);
        assert!(!map.claim("http://foo.bar/"));
    }

    #[test]
    fn test_finalize_never_overwrites() {
        let map = ClaimMap::new();
        map.claim("http://foo.bar/");
        map.finalize("http://foo.bar/", PageOutcome::Fetched(vec!["http://foo.bar/a".into()]));
        map.finalize("http://foo.bar/", PageOutcome::Failed);

        let result = map.to_result().unwrap();
        assert_eq!(result.links("http://foo.bar/"), Some(&["http://foo.bar/a".to_string()][..]));
    }

    #[test]
    fn test_finalize_without_claim_inserts_nothing() {
        let map = ClaimMap::new();
        map.finalize("http://foo.bar/", PageOutcome::Failed);
        assert!(map.to_result().unwrap().is_empty());
    }

    #[test]
    fn test_pending_entry_is_an_error() {
        let map = ClaimMap::new();
        map.claim("http://foo.bar/");
        let err = map.to_result().unwrap_err();
        assert!(matches!(err, WalkError::Unfinalized(url) if url == "http://foo.bar/"));
    }

    #[test]
    fn test_threads_race_for_one_claim() {
        let map = ClaimMap::new();
        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| map.claim("http://foo.bar/contested") as usize))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).sum()
        });
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_summary_counts() {
        let map = ClaimMap::new();
        for url in ["http://foo.bar/", "http://foo.bar/a", "http://foo.bar/b"] {
            map.claim(url);
        }
        map.finalize(
            "http://foo.bar/",
            PageOutcome::Fetched(vec!["http://foo.bar/a".into(), "http://foo.bar/b".into()]),
        );
        map.finalize("http://foo.bar/a", PageOutcome::Fetched(vec![]));
        map.finalize("http://foo.bar/b", PageOutcome::Failed);

        let result = map.to_result().unwrap();
        assert_eq!(result.pages(), 3);
        assert_eq!(result.links_found(), 2);
        assert_eq!(result.pages_failed(), 1);
        // Empty and failed are different things
        assert_eq!(result.links("http://foo.bar/a"), Some(&[][..]));
        assert_eq!(result.links("http://foo.bar/b"), None);
    }

    #[test]
    fn test_collect_from_pairs() {
        let result: CrawlResult = [
            ("http://foo.bar/b".to_string(), PageOutcome::Failed),
            ("http://foo.bar/".to_string(), PageOutcome::Fetched(vec![])),
        ]
        .into_iter()
        .collect();

        let urls: Vec<&str> = result.iter().map(|(url, _)| url).collect();
        assert_eq!(urls, vec!["http://foo.bar/", "http://foo.bar/b"]);
    }

    #[test]
    fn test_serialized_shape() {
        let map = ClaimMap::new();
        map.claim("http://foo.bar/");
        map.claim("http://foo.bar/a");
        map.finalize("http://foo.bar/", PageOutcome::Fetched(vec!["http://foo.bar/a".into()]));
        map.finalize("http://foo.bar/a", PageOutcome::Failed);

        let json = serde_json::to_value(map.to_result().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "http://foo.bar/": { "status": "fetched", "links": ["http://foo.bar/a"] },
                "http://foo.bar/a": { "status": "failed" }
            })
        );
    }
}
