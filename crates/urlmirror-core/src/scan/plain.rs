//! URLs embedded in arbitrary text.

use super::{LinkFlags, LinkOccurrence};
use crate::url_model::RECOGNIZED_SCHEMES;

/// Bytes that end a URL found in running text.
const URL_SEPARATORS: &[u8] = b"!\"#'(),>`{}|<";

fn is_url_byte(c: u8) -> bool {
    (32..127).contains(&c) && !c.is_ascii_whitespace() && !URL_SEPARATORS.contains(&c)
}

/// Start and length of the first URL in `buf`.
fn find_url(buf: &[u8]) -> Option<(usize, usize)> {
    for start in 0..buf.len() {
        let rest = &buf[start..];
        for scheme in RECOGNIZED_SCHEMES {
            // the scheme token alone is not a URL
            if rest.len() <= scheme.len() {
                continue;
            }
            if rest[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes()) {
                let len = rest.iter().take_while(|&&c| is_url_byte(c)).count();
                return Some((start, len));
            }
        }
    }
    None
}

/// Finds every URL with a recognized scheme in a plain-text buffer.
///
/// A URL starts at a scheme token and runs while bytes are printable,
/// non-whitespace ASCII outside ``!"#'(),>`{}|<``. No base is applied and no
/// flags are set.
pub fn scan_plain(buf: &[u8]) -> Vec<LinkOccurrence> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        let Some((start, len)) = find_url(&buf[pos..]) else {
            break;
        };
        let offset = pos + start;
        let text = String::from_utf8_lossy(&buf[offset..offset + len]).into_owned();
        out.push(LinkOccurrence::new(offset, len, text, LinkFlags::default()));
        pos = offset + len;
    }
    tracing::debug!(links = out.len(), "scanned plain text");
    out
}
