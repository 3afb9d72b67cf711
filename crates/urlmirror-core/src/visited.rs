//! Set of already-seen URLs, keyed by canonical string.

use std::collections::BTreeSet;

use crate::url_model::{parse_url_with, UnsafeSet, UrlError, UrlRecord};

/// URLs already queued or retrieved in this run. Spellings that canonicalize
/// to the same string count as one URL.
#[derive(Debug, Clone, Default)]
pub struct VisitedUrls {
    seen: BTreeSet<String>,
    unsafe_set: UnsafeSet,
}

impl VisitedUrls {
    pub fn new(unsafe_set: UnsafeSet) -> Self {
        Self {
            seen: BTreeSet::new(),
            unsafe_set,
        }
    }

    /// Adds a URL; returns false if it was already present.
    pub fn insert(&mut self, url: &UrlRecord) -> bool {
        self.seen.insert(url.canonical().to_string())
    }

    /// Parses `raw` and adds it.
    pub fn insert_raw(&mut self, raw: &str) -> Result<bool, UrlError> {
        let url = parse_url_with(raw, false, self.unsafe_set)?;
        Ok(self.insert(&url))
    }

    pub fn contains(&self, url: &UrlRecord) -> bool {
        self.seen.contains(url.canonical())
    }

    /// Whether `raw` parses to an already-seen URL.
    pub fn contains_raw(&self, raw: &str) -> bool {
        parse_url_with(raw, false, self.unsafe_set)
            .map(|u| self.contains(&u))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Canonical strings in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_spellings_are_one_entry() {
        let mut seen = VisitedUrls::new(UnsafeSet::Posix);
        assert!(seen.insert_raw("http://h/a/../b").unwrap());
        assert!(!seen.insert_raw("HTTP://h:80/b").unwrap());
        assert!(!seen.insert_raw("h/b").unwrap());
        assert_eq!(seen.len(), 1);
        assert!(seen.contains_raw("http://h/./b"));
    }

    #[test]
    fn iteration_is_sorted() {
        let mut seen = VisitedUrls::new(UnsafeSet::Posix);
        seen.insert_raw("http://h/z").unwrap();
        seen.insert_raw("ftp://f/a").unwrap();
        assert_eq!(
            seen.iter().collect::<Vec<_>>(),
            ["ftp://f:21/a", "http://h:80/z"]
        );
    }

    #[test]
    fn unparsable_urls() {
        let mut seen = VisitedUrls::default();
        assert!(seen.insert_raw("https://h/").is_err());
        assert!(!seen.contains_raw("https://h/"));
        assert!(seen.is_empty());
    }
}
