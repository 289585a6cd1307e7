// src/extract/html.rs
// =============================================================================
// This module extracts the outbound links of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Recovers from broken markup the way browsers do, so parsing never fails
//
// Every <a> counts, even one without an href. Each href is normalized
// against the page's own URL, and the result is deduplicated in the order
// the links first appear.
//
// Rust concepts:
// - Iterators: For processing collections
// - HashSet: To remember which links we've already kept
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use super::normalize;

// An anchor without an href behaves like a fragment-only link
const MISSING_HREF: &str = "#";

/// Extracts all links from `html`, which was fetched from `page_url`.
///
/// Returns normalized absolute URLs, deduplicated, in order of first
/// appearance. A page without anchors yields an empty list.
///
/// ```
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/intro").unwrap();
/// let html = "<a href='setup'>Setup</a><a href='#top'>Top</a><a href='/'>Home</a>";
/// let links = site_walker::extract::extract_links(&page, html);
/// assert_eq!(links, vec!["https://example.com/docs/setup", "https://example.com/"]);
/// ```
pub fn extract_links(page_url: &Url, html: &str) -> Vec<String> {
    // Parse the HTML into a document
    let document = Html::parse_document(html);

    // Our selector is a constant and known to be valid
    let selector = Selector::parse("a").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let href = element.value().attr("href").unwrap_or(MISSING_HREF);

        let Some(link) = normalize(page_url, href) else {
            continue;
        };

        // insert() returns false if we've kept this link already
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}
