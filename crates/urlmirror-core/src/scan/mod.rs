//! Link scanning: locating URL tokens in fetched documents.
//!
//! Scanners return [`LinkOccurrence`]s in strictly increasing offset order.
//! The byte span of each occurrence is what the rewriter later replaces, so
//! spans always refer to the buffer that was scanned.

mod html;
mod plain;
mod tokenizer;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use html::scan_html;
pub use plain::scan_plain;
pub use tokenizer::{AttrTokenizer, HtmlSpan, HtmlTokenizer, SpanKind};

/// Classification of a link as it appeared in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkFlags {
    /// No scheme and no leading `/`: relative to the document's directory.
    pub relative: bool,
    /// Written without a scheme and resolved against a base.
    pub no_scheme: bool,
}

/// One link found in a document buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOccurrence {
    /// Byte offset of the link text in the scanned buffer.
    pub offset: usize,
    /// Length of the link text in bytes.
    pub size: usize,
    /// Absolute URL text: resolved for scheme-less links, as written otherwise.
    pub url: String,
    pub flags: LinkFlags,
    convert: bool,
    local_name: Option<String>,
}

impl LinkOccurrence {
    pub fn new(offset: usize, size: usize, url: String, flags: LinkFlags) -> Self {
        Self {
            offset,
            size,
            url,
            flags,
            convert: false,
            local_name: None,
        }
    }

    /// One past the last byte of the span.
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Marks the link as pointing to a retrieved file stored at `local_name`,
    /// making it eligible for rewriting.
    pub fn mark_for_conversion(&mut self, local_name: impl Into<String>) {
        self.convert = true;
        self.local_name = Some(local_name.into());
    }

    pub fn is_marked_for_conversion(&self) -> bool {
        self.convert
    }

    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref()
    }
}

/// Options for [`scan_html`] (the `[scan]` section of the config file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Base used for scheme-less links when neither the document nor its
    /// URL provides one.
    #[serde(default)]
    pub base_href: Option<String>,
    /// Treat `http:foo` (no `//`) as the relative link `foo`.
    #[serde(default = "default_true")]
    pub http_relative_tolerance: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            base_href: None,
            http_relative_tolerance: true,
        }
    }
}

/// Loads a whole document for scanning.
pub fn load_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
