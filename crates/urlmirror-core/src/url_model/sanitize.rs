//! Filesystem-safe local name components.

use super::codec::{encode, UnsafeSet};

/// Escapes the bytes a local filesystem should not see in a path component.
///
/// Unsafe bytes become `%XX`. The Windows set also reserves `%` in names
/// handed to some tools, so there the escape character becomes `@`.
pub fn escape_local_component(name: &str, set: UnsafeSet) -> String {
    let escaped = encode(name, set);
    match set {
        UnsafeSet::Posix => escaped,
        UnsafeSet::Windows => escaped.replace('%', "@"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_keeps_percent_escapes() {
        assert_eq!(
            escape_local_component("h/a b/~x", UnsafeSet::Posix),
            "h/a%20b/%7Ex"
        );
    }

    #[test]
    fn windows_uses_at_sign() {
        assert_eq!(
            escape_local_component("h/a b/~x", UnsafeSet::Windows),
            "h/a@20b/~x"
        );
        assert_eq!(escape_local_component("100%", UnsafeSet::Windows), "100@25");
    }

    #[test]
    fn slashes_are_kept() {
        assert_eq!(escape_local_component("a/b/c", UnsafeSet::Posix), "a/b/c");
    }
}
