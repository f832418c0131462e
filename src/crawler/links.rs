//! Direct-child link extraction
//!
//! Contest ids, standings page numbers, and profile handles all appear on the
//! site as the last path segment below a fixed prefix (`/contest/1234`,
//! `/contest/1234/ratings/page/7`, `/profile/tourist`). `extract_links` pulls
//! those segments out of a document.

use crate::crawler::parser::Document;
use std::collections::HashSet;

/// Extracts the distinct direct-child suffixes of `prefix` among the document's links
///
/// An href is accepted when it:
/// - starts with `prefix`
/// - contains no fragment marker (`#`)
/// - has a non-empty remainder without any further `/`
///
/// Deeper links such as `/contest/1234/problem/A` are skipped for the prefix
/// `/contest/`. Suffixes are returned once each, in order of first appearance.
///
/// # Example
///
/// ```
/// use standings_crawler::crawler::{extract_links, Document};
///
/// let doc = Document::parse(
///     "https://example.com/contests",
///     r#"<a href="/contest/2">2</a><a href="/contest/2/standings">s</a><a href="/contest/1">1</a>"#,
/// );
/// assert_eq!(extract_links(&doc, "/contest/"), vec!["2", "1"]);
/// ```
pub fn extract_links(doc: &Document, prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut suffixes = Vec::new();

    for href in doc.anchor_hrefs() {
        if href.contains('#') {
            continue;
        }
        let Some(suffix) = href.strip_prefix(prefix) else {
            continue;
        };
        if suffix.is_empty() || suffix.contains('/') {
            continue;
        }
        if seen.insert(suffix) {
            suffixes.push(suffix.to_string());
        }
    }

    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_page() -> Document {
        Document::parse(
            "https://codeforces.com/contests/page/1",
            r##"<html><body>
            <a href="/contest/1500">Enter</a>
            <a href="/contest/1500/standings">Standings</a>
            <a href="/contest/1500#registration">Register</a>
            <a href="/contest/1499">Enter</a>
            <a href="/contest/1500">Enter again</a>
            <a href="/contests/page/2">next</a>
            <a href="/contest/">empty</a>
            <a href="https://codeforces.com/contest/1498">absolute</a>
            <a href="/gym/1497">gym</a>
            </body></html>"##,
        )
    }

    #[test]
    fn test_extracts_direct_children_only() {
        assert_eq!(extract_links(&index_page(), "/contest/"), vec!["1500", "1499"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = index_page();
        let first = extract_links(&doc, "/contest/");
        let second = extract_links(&doc, "/contest/");

        assert_eq!(first, second);
        let as_set: HashSet<_> = first.iter().collect();
        assert_eq!(as_set.len(), first.len());
    }

    #[test]
    fn test_page_links_keep_query() {
        let doc = Document::parse(
            "https://codeforces.com/contest/1/ratings/page/1",
            r#"<a href="/contest/1/ratings/page/1?order=BY_RATING">1</a>
               <a href="/contest/1/ratings/page/2">2</a>"#,
        );
        assert_eq!(
            extract_links(&doc, "/contest/1/ratings/page/"),
            vec!["1?order=BY_RATING", "2"]
        );
    }

    #[test]
    fn test_no_matches() {
        let doc = Document::parse("https://example.com/", "<p>no links</p>");
        assert!(extract_links(&doc, "/contest/").is_empty());
    }
}
