//! In-memory site standing in for HTTP/FTP retrieval in mirror tests.

use std::collections::BTreeMap;
use std::fs;

use urlmirror_core::mapper::MirrorSession;
use urlmirror_core::url_model::{parse_url_with, UnsafeSet, UrlRecord};

/// Documents keyed by canonical URL.
pub struct Site {
    pages: BTreeMap<String, Vec<u8>>,
}

impl Site {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        let pages = pages
            .iter()
            .map(|(url, body)| (parse(url).canonical().to_string(), body.as_bytes().to_vec()))
            .collect();
        Self { pages }
    }

    /// "Retrieves" `url` into the session: assigns its local name and writes
    /// the body there. Returns the local name, or `None` for unknown URLs.
    pub fn fetch(&self, session: &MirrorSession, url: &UrlRecord) -> Option<String> {
        let body = self.pages.get(url.canonical())?;
        let local = session.map(url).unwrap();
        fs::write(session.local_path(&local), body).unwrap();
        Some(local)
    }
}

pub fn parse(raw: &str) -> UrlRecord {
    parse_url_with(raw, false, UnsafeSet::Posix).unwrap()
}
