//! Reference resolution: merging a link with its base URL, and the inverse,
//! expressing one local path relative to another.
//!
//! Both directions work on plain strings. Dot segments are not simplified
//! here; the parser does that once the merged string is parsed.

/// Merges `reference` with `base`.
///
/// A reference with its own scheme is returned (trimmed) as is. One starting
/// with `/` replaces everything after the base's authority. Anything else
/// replaces the last path segment of the base.
///
/// # Examples
///
/// - `resolve_absolute("http://h/a/b.html", "c.html", true)` → `"http://h/a/c.html"`
/// - `resolve_absolute("http://h/a/b.html", "/c.html", true)` → `"http://h/c.html"`
pub fn resolve_absolute(base: &str, reference: &str, reference_has_no_scheme: bool) -> String {
    if !reference_has_no_scheme {
        return reference.trim().to_string();
    }
    let b = base.as_bytes();

    if !reference.starts_with('/') {
        let last = b.iter().rposition(|&c| c == b'/').unwrap_or(0);
        let mut out = String::with_capacity(base.len() + 1 + reference.len());
        if last == 0 || b[last - 1] == b'/' {
            // base has no path: `http://h` → `http://h/`
            out.push_str(base);
            out.push('/');
        } else {
            out.push_str(&base[..=last]);
        }
        out.push_str(reference);
        return out;
    }

    // find the first single `/` past the authority, skipping `//` pairs
    let mut i = 0;
    let end = loop {
        match b[i..].iter().position(|&c| c == b'/') {
            None => break None,
            Some(p) => {
                i += p;
                if b.get(i + 1) == Some(&b'/') {
                    i += 2;
                } else {
                    break Some(i);
                }
            }
        }
    };
    let mut out = String::with_capacity(base.len() + reference.len());
    match end {
        Some(i) => out.push_str(&base[..i]),
        None => out.push_str(base),
    }
    out.push_str(reference);
    out
}

/// Path that leads from the local file `from` to the local file `to`.
///
/// An absolute `to` is returned unchanged. Otherwise whole leading segments
/// shared by both paths are skipped, one `../` is emitted for each directory
/// left in `from`, and the rest of `to` follows.
///
/// `from` must be relative and neither path may hold dot segments.
pub fn to_relative(from: &str, to: &str) -> String {
    if to.starts_with('/') {
        return to.to_string();
    }
    debug_assert!(!from.starts_with('/'), "from path must be relative: {from}");

    let a = from.as_bytes();
    let b = to.as_bytes();
    let mut common = 0;
    let mut i = 0;
    loop {
        while i < a.len() && i < b.len() && a[i] == b[i] && a[i] != b'/' {
            i += 1;
        }
        if i < a.len() && i < b.len() && a[i] == b'/' && b[i] == b'/' {
            i += 1;
            common = i;
        } else {
            break;
        }
    }

    let ups = a[common..].iter().filter(|&&c| c == b'/').count();
    let mut out = String::with_capacity(ups * 3 + to.len() - common);
    for _ in 0..ups {
        out.push_str("../");
    }
    out.push_str(&to[common..]);
    out
}
