//! Link extraction from HTML documents.

use super::tokenizer::{HtmlTokenizer, SpanKind};
use super::{LinkFlags, LinkOccurrence, ScanOptions};
use crate::resolve::resolve_absolute;
use crate::url_model::{has_scheme, recognized_scheme, supported_prefix};

fn starts_with_ignore_case(s: &[u8], prefix: &[u8]) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Offset and length of `raw` without surrounding ASCII whitespace.
fn trim_span(raw: &[u8]) -> (usize, usize) {
    let lead = raw.iter().take_while(|c| c.is_ascii_whitespace()).count();
    let trail = raw[lead..]
        .iter()
        .rev()
        .take_while(|c| c.is_ascii_whitespace())
        .count();
    (lead, raw.len() - lead - trail)
}

/// Base URL for scheme-less links, or `None` (after logging) when there is
/// none to use.
fn effective_base(
    document_base: Option<&str>,
    current_url: Option<&str>,
    options: &ScanOptions,
    link: &str,
) -> Option<String> {
    let Some(base) = document_base
        .or(current_url)
        .or(options.base_href.as_deref())
    else {
        tracing::warn!("link {} without a base provided", link);
        return None;
    };
    match current_url {
        Some(this) => Some(resolve_absolute(this, base, !has_scheme(base))),
        None if has_scheme(base) => Some(base.to_string()),
        None => {
            tracing::warn!("base {} relative, without referer URL", base);
            None
        }
    }
}

/// Extracts links from an HTML buffer.
///
/// `current_url` is the URL the document was fetched from. Scheme-less links
/// are resolved against, in order of preference, the document's
/// `<base href>`, `current_url` and the configured default base. Links whose
/// scheme is recognized but not retrievable are dropped, as are scheme-less
/// links with no usable base.
pub fn scan_html(
    buf: &[u8],
    current_url: Option<&str>,
    tokenizer: &dyn HtmlTokenizer,
    options: &ScanOptions,
) -> Vec<LinkOccurrence> {
    let mut out: Vec<LinkOccurrence> = Vec::new();
    let mut document_base: Option<String> = None;

    for span in tokenizer.spans(buf) {
        let Some(raw) = buf.get(span.offset..span.offset + span.size) else {
            tracing::debug!(offset = span.offset, size = span.size, "span outside buffer");
            continue;
        };
        if out.last().is_some_and(|prev| span.offset < prev.end()) {
            tracing::debug!(offset = span.offset, "span out of order");
            continue;
        }
        let (lead, len) = trim_span(raw);
        if len == 0 {
            continue;
        }
        let mut offset = span.offset + lead;
        let mut text = &raw[lead..lead + len];

        if span.kind == SpanKind::Base {
            document_base = Some(String::from_utf8_lossy(text).into_owned());
            continue;
        }

        let sloppy_http = options.http_relative_tolerance
            && starts_with_ignore_case(text, b"http:")
            && !starts_with_ignore_case(text, b"http://");
        let no_scheme = sloppy_http || recognized_scheme(text).is_none();
        if sloppy_http && text.len() > 5 {
            offset += 5;
            text = &text[5..];
        }
        let link = String::from_utf8_lossy(text);

        if !no_scheme && supported_prefix(text).is_none() {
            tracing::debug!("skipping link with unsupported scheme: {}", link);
            continue;
        }

        let url = if no_scheme {
            let Some(base) =
                effective_base(document_base.as_deref(), current_url, options, &link)
            else {
                continue;
            };
            resolve_absolute(&base, &link, true)
        } else {
            link.to_string()
        };

        let flags = LinkFlags {
            relative: no_scheme && !text.starts_with(b"/"),
            no_scheme,
        };
        out.push(LinkOccurrence::new(offset, text.len(), url, flags));
    }

    tracing::debug!(
        links = out.len(),
        document = current_url.unwrap_or("-"),
        "scanned html"
    );
    out
}
