//! HTML tokenizer capability and a built-in attribute scanner.
//!
//! The scanner only needs the byte spans of link-bearing attribute values and
//! of `<base href>`, in document order. Anything able to produce those can
//! stand in for [`AttrTokenizer`].

/// What an attribute value span holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// A link to another resource.
    Link,
    /// The document's `<base href>`.
    Base,
}

/// Byte span of an attribute value inside the tokenized buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlSpan {
    pub offset: usize,
    pub size: usize,
    pub kind: SpanKind,
}

/// Source of link attribute spans for an HTML buffer.
pub trait HtmlTokenizer {
    /// Spans in increasing offset order, each within `buffer`.
    fn spans(&self, buffer: &[u8]) -> Vec<HtmlSpan>;
}

/// (tag, attribute) pairs whose value is a link.
const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("applet", "code"),
    ("area", "href"),
    ("bgsound", "src"),
    ("body", "background"),
    ("embed", "src"),
    ("fig", "src"),
    ("form", "action"),
    ("frame", "src"),
    ("iframe", "src"),
    ("img", "lowsrc"),
    ("img", "src"),
    ("input", "src"),
    ("layer", "src"),
    ("link", "href"),
    ("object", "data"),
    ("overlay", "src"),
    ("script", "src"),
    ("table", "background"),
    ("td", "background"),
    ("th", "background"),
];

fn classify(tag: &str, attr: &str) -> Option<SpanKind> {
    if tag == "base" && attr == "href" {
        return Some(SpanKind::Base);
    }
    LINK_ATTRIBUTES
        .iter()
        .any(|&(t, a)| t == tag && a == attr)
        .then_some(SpanKind::Link)
}

/// Tag-and-attribute scanner: enough HTML for link discovery, no tree.
///
/// Comments, declarations and end tags are skipped. Attribute values may be
/// double-quoted, single-quoted or bare; names are matched case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttrTokenizer;

fn find(buf: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= buf.len() {
        return None;
    }
    buf[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn skip_ws(buf: &[u8], mut i: usize) -> usize {
    while i < buf.len() && buf[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':' || c == b'.'
}

impl HtmlTokenizer for AttrTokenizer {
    fn spans(&self, buf: &[u8]) -> Vec<HtmlSpan> {
        let mut out = Vec::new();
        let mut i = 0;
        while let Some(lt) = find(buf, i, b"<") {
            i = lt + 1;
            if buf[i..].starts_with(b"!--") {
                match find(buf, i + 3, b"-->") {
                    Some(end) => {
                        i = end + 3;
                        continue;
                    }
                    None => break,
                }
            }
            if i < buf.len() && matches!(buf[i], b'!' | b'?' | b'/') {
                match find(buf, i, b">") {
                    Some(end) => {
                        i = end + 1;
                        continue;
                    }
                    None => break,
                }
            }

            let name_start = i;
            while i < buf.len() && is_name_byte(buf[i]) {
                i += 1;
            }
            if i == name_start {
                continue;
            }
            let tag = String::from_utf8_lossy(&buf[name_start..i]).to_ascii_lowercase();

            match self.attributes(buf, i, &tag, &mut out) {
                Some(next) => i = next,
                None => break,
            }
        }
        out
    }
}

impl AttrTokenizer {
    /// Walks the attributes of one tag starting at `i`, pushing link spans.
    /// Returns the position after the tag, or `None` if the buffer ends
    /// inside a quoted value.
    fn attributes(
        &self,
        buf: &[u8],
        mut i: usize,
        tag: &str,
        out: &mut Vec<HtmlSpan>,
    ) -> Option<usize> {
        loop {
            i = skip_ws(buf, i);
            if i >= buf.len() {
                return Some(i);
            }
            match buf[i] {
                b'>' => return Some(i + 1),
                b'/' => {
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let name_start = i;
            while i < buf.len()
                && !buf[i].is_ascii_whitespace()
                && !matches!(buf[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            if i == name_start {
                // stray `=`
                i += 1;
                continue;
            }
            let attr = String::from_utf8_lossy(&buf[name_start..i]).to_ascii_lowercase();

            let after_name = skip_ws(buf, i);
            if after_name >= buf.len() || buf[after_name] != b'=' {
                i = after_name;
                continue;
            }
            i = skip_ws(buf, after_name + 1);
            if i >= buf.len() {
                return Some(i);
            }

            let (start, end) = match buf[i] {
                q @ (b'"' | b'\'') => {
                    let close = buf[i + 1..].iter().position(|&c| c == q)?;
                    let start = i + 1;
                    i = start + close + 1;
                    (start, start + close)
                }
                _ => {
                    let start = i;
                    while i < buf.len() && !buf[i].is_ascii_whitespace() && buf[i] != b'>' {
                        i += 1;
                    }
                    (start, i)
                }
            };

            if let Some(kind) = classify(tag, &attr) {
                out.push(HtmlSpan {
                    offset: start,
                    size: end - start,
                    kind,
                });
            }
        }
    }
}
