//! Scheme catalog: recognized scheme tokens and the supported subset.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UrlError;

/// Scheme tokens that mark a string as "looks like a URL". Only a subset is
/// actually supported for retrieval.
pub const RECOGNIZED_SCHEMES: &[&str] = &[
    "cid:", "clsid:", "file:", "finger:", "ftp:", "gopher:", "hdl:", "http:", "https:", "ilu:",
    "ior:", "irc:", "java:", "javascript:", "lifn:", "mailto:", "mid:", "news:", "nntp:",
    "path:", "prospero:", "rlogin:", "service:", "shttp:", "snews:", "stanf:", "telnet:",
    "tn3270:", "wais:", "whois++:",
];

/// Retrieval schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Ftp,
}

const SUPPORTED: &[(&str, Scheme)] = &[("http://", Scheme::Http), ("ftp://", Scheme::Ftp)];

impl Scheme {
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => "http://",
            Scheme::Ftp => "ftp://",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Ftp => 21,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Ftp => f.write_str("ftp"),
        }
    }
}

pub(crate) fn starts_with_ignore_case(s: &[u8], prefix: &str) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Length of a leading `URL:` token and the whitespace after it, or 0.
pub fn skip_url_token(s: &str) -> usize {
    let b = s.as_bytes();
    if !starts_with_ignore_case(b, "URL:") {
        return 0;
    }
    let mut i = 4;
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Catalog entry the string starts with, ignoring case.
pub fn recognized_scheme(s: &[u8]) -> Option<&'static str> {
    RECOGNIZED_SCHEMES
        .iter()
        .copied()
        .find(|p| starts_with_ignore_case(s, p))
}

/// Whether the string (after an optional `URL:` token) starts with a
/// recognized scheme.
pub fn has_scheme(s: &str) -> bool {
    let s = &s[skip_url_token(s)..];
    recognized_scheme(s.as_bytes()).is_some()
}

/// Length of the recognized scheme prefix, counting the `//` that follows
/// `http:` and `ftp:`. Zero when nothing is recognized.
pub fn scheme_len(s: &str) -> usize {
    match recognized_scheme(s.as_bytes()) {
        Some(p) if p == "http:" || p == "ftp:" => p.len() + 2,
        Some(p) => p.len(),
        None => 0,
    }
}

/// Supported scheme and the length of its prefix, if `s` starts with one.
pub fn supported_prefix(s: &[u8]) -> Option<(Scheme, usize)> {
    SUPPORTED
        .iter()
        .find(|(p, _)| starts_with_ignore_case(s, p))
        .map(|&(p, scheme)| (scheme, p.len()))
}

/// Classifies the protocol of a raw string without building a record.
///
/// A supported prefix wins. Otherwise `host:digits` means HTTP, `host:` followed
/// by `/` or nothing means a legacy FTP `host:dir`, and any other text after the
/// colon is a bad port. No colon at all means HTTP.
pub fn guess_scheme(raw: &str) -> Result<Scheme, UrlError> {
    let s = &raw[skip_url_token(raw)..];
    if let Some((scheme, _)) = supported_prefix(s.as_bytes()) {
        return Ok(scheme);
    }
    let b = s.as_bytes();
    let Some(colon) = b.iter().position(|&c| c == b':' || c == b'/') else {
        return Ok(Scheme::Http);
    };
    if b[colon] == b'/' {
        return Ok(Scheme::Http);
    }
    let rest = &b[colon + 1..];
    let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && (digits == rest.len() || rest[digits] == b'/') {
        Ok(Scheme::Http)
    } else if digits == 0 && (rest.is_empty() || rest[0] == b'/') {
        Ok(Scheme::Ftp)
    } else {
        Err(UrlError::BadPort(raw.to_string()))
    }
}
