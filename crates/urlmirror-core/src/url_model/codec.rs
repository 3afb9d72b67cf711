//! Percent-encoding and decoding of URL components.

use serde::{Deserialize, Serialize};

const POSIX_UNSAFE: &[u8] = b" <>\"#%{}|\\^~[]`@:\x1b";
const WINDOWS_UNSAFE: &[u8] = b" <>\"%{}|\\^[]`\x1b";

/// Set of bytes that must be `%XX`-escaped when a component is written back
/// into a URL or a local filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsafeSet {
    Posix,
    Windows,
}

impl UnsafeSet {
    /// The set matching the filesystem of the running platform.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            UnsafeSet::Windows
        } else {
            UnsafeSet::Posix
        }
    }

    fn bytes(self) -> &'static [u8] {
        match self {
            UnsafeSet::Posix => POSIX_UNSAFE,
            UnsafeSet::Windows => WINDOWS_UNSAFE,
        }
    }

    pub fn contains(self, b: u8) -> bool {
        self.bytes().contains(&b)
    }
}

impl Default for UnsafeSet {
    fn default() -> Self {
        Self::platform_default()
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Replaces every `%XY` with the byte `0xXY`. A `%` that is not followed by
/// two hex digits is copied literally.
pub fn decode_bytes(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' && i + 2 < input.len() {
            if let (Some(h), Some(l)) = (hex_value(input[i + 1]), hex_value(input[i + 2])) {
                out.push(h * 16 + l);
                i += 3;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}

/// Decoded bytes that are not part of valid UTF-8 are carried in the text
/// as U+F780..=U+F7FF (byte 0x80 + n is U+F780 + n), so that [`encode`] can
/// write them back as the same `%XX`.
const RAW_BYTE_BASE: u32 = 0xF700;

fn raw_byte_char(b: u8) -> char {
    char::from_u32(RAW_BYTE_BASE + u32::from(b)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// The byte a raw-byte character stands for.
fn raw_byte(c: char) -> Option<u8> {
    let v = u32::from(c);
    if (RAW_BYTE_BASE + 0x80..=RAW_BYTE_BASE + 0xff).contains(&v) {
        u8::try_from(v - RAW_BYTE_BASE).ok()
    } else {
        None
    }
}

/// Appends valid text. A character that collides with the raw-byte range is
/// split into its bytes so it cannot be mistaken for one.
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if raw_byte(c).is_some() {
            let mut buf = [0u8; 4];
            out.extend(c.encode_utf8(&mut buf).bytes().map(raw_byte_char));
        } else {
            out.push(c);
        }
    }
}

/// Text form of [`decode_bytes`].
///
/// Each escape is decoded on its own. Bytes that do not form valid UTF-8
/// stay distinguishable from the literal text `%XX`: `a%FFb` and `a%25FFb`
/// decode to different strings, and re-encode to their own canonical forms.
pub fn decode(input: &str) -> String {
    if !input.contains('%') && !input.chars().any(|c| raw_byte(c).is_some()) {
        return input.to_string();
    }
    let bytes = decode_bytes(input.as_bytes());
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes.as_slice();
    loop {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                push_text(&mut out, text);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    push_text(&mut out, text);
                }
                let bad = e.error_len().unwrap_or(after.len());
                out.extend(after[..bad].iter().copied().map(raw_byte_char));
                rest = &after[bad..];
            }
        }
    }
    out
}

/// Escapes every byte in `set` as `%` followed by two uppercase hex digits.
/// Raw bytes kept by [`decode`] are written back as their escape.
pub fn encode(input: &str, set: UnsafeSet) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    if !contains_unsafe(input, set) {
        return input.to_string();
    }
    let push_escape = |out: &mut String, b: u8| {
        out.push('%');
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    };
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        if c.is_ascii() && set.contains(c as u8) {
            push_escape(&mut out, c as u8);
        } else if let Some(b) = raw_byte(c) {
            push_escape(&mut out, b);
        } else {
            out.push(c);
        }
    }
    out
}

/// Writes only the raw bytes kept by [`decode`] back as `%XX`, leaving all
/// other text alone.
pub fn escape_raw_bytes(input: &str) -> String {
    if !input.chars().any(|c| raw_byte(c).is_some()) {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match raw_byte(c) {
            Some(b) => out.push_str(&format!("%{b:02X}")),
            None => out.push(c),
        }
    }
    out
}

/// Whether `input` has anything [`encode`] would escape.
pub fn contains_unsafe(input: &str, set: UnsafeSet) -> bool {
    input.bytes().any(|b| set.contains(b)) || input.chars().any(|c| raw_byte(c).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_escapes_case_insensitively() {
        assert_eq!(decode("a%20b"), "a b");
        assert_eq!(decode("%7e%7E"), "~~");
        assert_eq!(decode("%2Fetc"), "/etc");
    }

    #[test]
    fn malformed_escapes_are_literal() {
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%4"), "%4");
        assert_eq!(decode("%zz%41"), "%zzA");
        assert_eq!(decode_bytes(b"%"), b"%");
    }

    #[test]
    fn decode_never_grows() {
        for s in ["", "%", "%%%", "%41%42", "plain", "%g1%2"] {
            assert!(decode_bytes(s.as_bytes()).len() <= s.len());
        }
    }

    #[test]
    fn invalid_utf8_is_decoded_per_escape() {
        assert_eq!(decode("%C3%A9"), "\u{e9}");
        assert_eq!(decode_bytes(b"a%FFb"), vec![b'a', 0xff, b'b']);
        let raw = decode("%FF%20x");
        assert!(raw.ends_with(" x"));
        assert_eq!(encode(&raw, UnsafeSet::Posix), "%FF%20x");
        assert_eq!(encode(&decode("%E2%82x%C3%A9"), UnsafeSet::Posix), "%E2%82x\u{e9}");
    }

    #[test]
    fn raw_byte_and_literal_percent_differ() {
        let byte = decode("a%FFb");
        let literal = decode("a%25FFb");
        assert_ne!(byte, literal);
        assert_eq!(encode(&byte, UnsafeSet::Posix), "a%FFb");
        assert_eq!(encode(&literal, UnsafeSet::Posix), "a%25FFb");
    }

    #[test]
    fn raw_bytes_alone_are_reescaped() {
        assert_eq!(escape_raw_bytes(&decode("a b%FF")), "a b%FF");
        assert_eq!(escape_raw_bytes("plain"), "plain");
    }

    #[test]
    fn private_use_text_round_trips_as_bytes() {
        let s = decode("\u{f7ff}");
        assert_eq!(encode(&s, UnsafeSet::Posix), "%EF%9F%BF");
        assert_eq!(s, decode("%EF%9F%BF"));
    }

    #[test]
    fn encodes_posix_set() {
        assert_eq!(encode("a b", UnsafeSet::Posix), "a%20b");
        assert_eq!(encode("~user@host:1", UnsafeSet::Posix), "%7Euser%40host%3A1");
        assert_eq!(encode("100%", UnsafeSet::Posix), "100%25");
        assert_eq!(encode("\u{e9}t\u{e9}", UnsafeSet::Posix), "\u{e9}t\u{e9}");
    }

    #[test]
    fn windows_set_leaves_tilde_and_colon() {
        assert_eq!(encode("~a:b#c", UnsafeSet::Windows), "~a:b#c");
        assert_eq!(encode("a%b", UnsafeSet::Windows), "a%25b");
    }

    #[test]
    fn encoding_safe_text_is_noop() {
        let s = "pub/debian/dists/index.html";
        assert!(!contains_unsafe(s, UnsafeSet::Posix));
        assert_eq!(encode(s, UnsafeSet::Posix), s);
    }

    #[test]
    fn unsafe_set_from_toml_name() {
        #[derive(Deserialize)]
        struct W {
            set: UnsafeSet,
        }
        let w: W = toml::from_str("set = \"windows\"").unwrap();
        assert_eq!(w.set, UnsafeSet::Windows);
    }
}
