// src/extract/normalize.rs
// =============================================================================
// Canonicalizes an href so that every spelling of a page maps to one key.
//
// Steps:
// 1. Lower-case the whole href
// 2. Cut off the fragment (#...)
// 3. Skip it if nothing is left
// 4. Resolve it against the page it was found on
//
// "http://foo.bar", "HTTP://FOO.BAR/#top" and "/" on http://foo.bar/ all come
// out as "http://foo.bar/".
// =============================================================================

use url::Url;

/// Normalizes `href` found on the page at `base`.
///
/// Returns `None` for fragment-only or empty hrefs, and for hrefs that do not
/// resolve to a valid URL.
pub fn normalize(base: &Url, href: &str) -> Option<String> {
    let href = href.to_lowercase();

    let without_fragment = match href.find('#') {
        Some(index) => &href[..index],
        None => href.as_str(),
    };

    if without_fragment.is_empty() {
        return None;
    }

    // join() handles absolute URLs, absolute paths and relative paths alike
    base.join(without_fragment).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_fragment_only_is_skipped() {
        assert_eq!(normalize(&base("http://foo.bar/"), "#frag"), None);
    }

    #[test]
    fn test_empty_is_skipped() {
        assert_eq!(normalize(&base("http://foo.bar/"), ""), None);
    }

    #[test]
    fn test_fragment_is_stripped() {
        assert_eq!(
            normalize(&base("http://foo.bar/"), "/docs#intro").as_deref(),
            Some("http://foo.bar/docs")
        );
    }

    #[test]
    fn test_lower_cases() {
        assert_eq!(
            normalize(&base("http://foo.bar/"), "HTTP://FOO.BAR/About").as_deref(),
            Some("http://foo.bar/about")
        );
    }

    #[test]
    fn test_bare_authority_gets_root_path() {
        assert_eq!(
            normalize(&base("http://foo.bar/"), "http://foo.bar").as_deref(),
            Some("http://foo.bar/")
        );
    }

    #[test]
    fn test_relative_to_linking_page() {
        assert_eq!(
            normalize(&base("http://foo.bar/baz/aca"), "other").as_deref(),
            Some("http://foo.bar/baz/other")
        );
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(
            normalize(&base("http://foo.bar/baz/aca"), "/other").as_deref(),
            Some("http://foo.bar/other")
        );
    }

    #[test]
    fn test_parent_directory() {
        assert_eq!(
            normalize(&base("http://foo.bar/a/b/c"), "../d").as_deref(),
            Some("http://foo.bar/a/d")
        );
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(
            normalize(&base("https://foo.bar/"), "//cdn.foo.bar/x").as_deref(),
            Some("https://cdn.foo.bar/x")
        );
    }

    #[test]
    fn test_unresolvable_is_dropped() {
        // An empty host cannot be resolved
        assert_eq!(normalize(&base("http://foo.bar/"), "http://"), None);
    }
}
