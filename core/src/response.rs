//! Paged responses over list endpoints.
//!
//! # Design
//! A `PagedResponse<T>` is an immutable snapshot of one page: the ordered
//! items, the URL that produced it, and the adjacent-page URLs the server
//! advertised in its `Link` header. Traversal never mutates a page — the
//! client fetches the link and returns a fresh `PagedResponse`, so callers
//! chain by reassignment:
//!
//! ```ignore
//! let mut page = client.fetch_posts(&SearchRequest::posts())?;
//! while page.has_next() {
//!     page = client.traverse(&page, Direction::Next)?;
//! }
//! ```
//!
//! The final page of a chain carries no `next` link, so forward loops
//! always terminate.

use std::fmt;

/// Traversal direction over a page chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => write!(f, "next"),
            Direction::Previous => write!(f, "previous"),
        }
    }
}

/// One page of a list endpoint's results, with links to adjacent pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResponse<T> {
    items: Vec<T>,
    self_url: String,
    next: Option<String>,
    previous: Option<String>,
}

impl<T> PagedResponse<T> {
    pub fn new(
        items: Vec<T>,
        self_url: impl Into<String>,
        next: Option<String>,
        previous: Option<String>,
    ) -> Self {
        Self {
            items,
            self_url: self_url.into(),
            next,
            previous,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The endpoint URL (including query) that produced this page.
    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// The advertised URL in the given direction, if any.
    pub fn link(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Next => self.next.as_deref(),
            Direction::Previous => self.previous.as_deref(),
        }
    }
}

/// Extract the `next` and `previous` URLs from a `Link` header value of the
/// form `<url>; rel="next", <url>; rel="prev"`. Both `prev` and `previous`
/// are accepted; unknown rels and malformed segments are ignored.
pub(crate) fn parse_link_header(value: &str) -> (Option<String>, Option<String>) {
    let mut next = None;
    let mut previous = None;
    for segment in value.split(',') {
        let mut url = None;
        let mut rel = None;
        for part in segment.split(';') {
            let part = part.trim();
            if part.starts_with('<') && part.ends_with('>') {
                url = Some(&part[1..part.len() - 1]);
            } else if let Some(value) = part.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }
        match (url, rel) {
            (Some(url), Some("next")) => next = Some(url.to_string()),
            (Some(url), Some("prev")) | (Some(url), Some("previous")) => {
                previous = Some(url.to_string())
            }
            _ => {}
        }
    }
    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(next: Option<&str>, previous: Option<&str>) -> PagedResponse<u64> {
        PagedResponse::new(
            vec![1, 2, 3],
            "http://wp.example.org/wp-json/wp/v2/posts",
            next.map(String::from),
            previous.map(String::from),
        )
    }

    #[test]
    fn predicates_track_link_presence() {
        let first = page(Some("http://x/?page=2"), None);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = page(None, Some("http://x/?page=1"));
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn link_selects_by_direction() {
        let p = page(Some("http://x/?page=2"), Some("http://x/?page=1"));
        assert_eq!(p.link(Direction::Next), Some("http://x/?page=2"));
        assert_eq!(p.link(Direction::Previous), Some("http://x/?page=1"));
    }

    #[test]
    fn parses_next_and_prev_rels() {
        let (next, previous) = parse_link_header(
            "<http://x/posts?page=3>; rel=\"next\", <http://x/posts?page=1>; rel=\"prev\"",
        );
        assert_eq!(next.as_deref(), Some("http://x/posts?page=3"));
        assert_eq!(previous.as_deref(), Some("http://x/posts?page=1"));
    }

    #[test]
    fn accepts_previous_as_rel_spelling() {
        let (_, previous) =
            parse_link_header("<http://x/posts?page=1>; rel=\"previous\"");
        assert_eq!(previous.as_deref(), Some("http://x/posts?page=1"));
    }

    #[test]
    fn ignores_unknown_rels_and_malformed_segments() {
        let (next, previous) = parse_link_header(
            "<http://x/alt>; rel=\"alternate\", garbage, <http://x/posts?page=2>; rel=next",
        );
        assert_eq!(next.as_deref(), Some("http://x/posts?page=2"));
        assert!(previous.is_none());
    }

    #[test]
    fn empty_header_yields_no_links() {
        assert_eq!(parse_link_header(""), (None, None));
    }
}
