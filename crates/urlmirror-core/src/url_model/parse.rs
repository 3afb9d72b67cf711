//! Raw string to [`UrlRecord`].
//!
//! The steps run in a fixed order: `URL:` token, scheme, credentials, host,
//! port, delimiter, FTP type, decoding, dir/file split, simplification.
//! Reordering them changes results for malformed input.

use super::codec::{decode, UnsafeSet};
use super::path::{simplify, split_dir_file};
use super::record::{Components, FtpType, UrlRecord};
use super::scheme::{has_scheme, scheme_len, skip_url_token, supported_prefix, Scheme};
use super::UrlError;

/// Parses with the platform's unsafe-character set.
///
/// With `strict`, input without a recognized scheme is rejected; otherwise a
/// bare `host/path` is taken as HTTP and `host:dir` as FTP.
pub fn parse_url(raw: &str, strict: bool) -> Result<UrlRecord, UrlError> {
    parse_url_with(raw, strict, UnsafeSet::platform_default())
}

/// Parses `raw`, encoding components with `set` when rebuilding strings.
pub fn parse_url_with(raw: &str, strict: bool, set: UnsafeSet) -> Result<UrlRecord, UrlError> {
    let url = &raw[skip_url_token(raw)..];
    let b = url.as_bytes();

    let recognized = has_scheme(url);
    if strict && !recognized {
        return Err(UrlError::UnknownScheme(raw.to_string()));
    }

    let mut scheme = None;
    let mut i = 0;
    if recognized {
        let Some((s, len)) = supported_prefix(b) else {
            return Err(UrlError::UnknownScheme(raw.to_string()));
        };
        scheme = Some(s);
        i = len;
    }

    let (user, password) = if recognized {
        parse_userinfo(url)
    } else {
        (None, None)
    };
    if recognized {
        i += userinfo_len(&b[i..]);
    }

    let host_start = i;
    while i < b.len() && b[i] != b':' && b[i] != b'/' {
        i += 1;
    }
    if i == host_start {
        return Err(UrlError::BadHost(raw.to_string()));
    }
    let host = &url[host_start..i];

    let mut port: u32 = 0;
    if i < b.len() && b[i] == b':' {
        i += 1;
        if i < b.len() && b[i].is_ascii_digit() {
            scheme.get_or_insert(Scheme::Http);
            while i < b.len() && b[i] != b'/' {
                if !b[i].is_ascii_digit() {
                    return Err(UrlError::BadPort(raw.to_string()));
                }
                port = port * 10 + u32::from(b[i] - b'0');
                if port > u32::from(u16::MAX) {
                    return Err(UrlError::BadPort(raw.to_string()));
                }
                i += 1;
            }
            if port == 0 {
                return Err(UrlError::BadPort(raw.to_string()));
            }
        } else if scheme.is_none() {
            // legacy `host:dir` form
            scheme = Some(Scheme::Ftp);
        } else {
            return Err(UrlError::BadPort(raw.to_string()));
        }
    }
    let scheme = scheme.unwrap_or(Scheme::Http);
    let port = if port == 0 {
        scheme.default_port()
    } else {
        port as u16
    };

    if i < b.len() && b[i] == b'/' && b[i - 1] != b':' {
        i += 1;
    }
    if scheme == Scheme::Http {
        while i < b.len() && b[i] == b'/' {
            i += 1;
        }
    }
    let mut path = &url[i..];

    let ftp_type = if scheme == Scheme::Ftp {
        let (stripped, code) = strip_ftp_type(path);
        path = stripped;
        Some(match code {
            Some(b'a') | Some(b'A') => FtpType::Ascii,
            _ => FtpType::Image,
        })
    } else {
        None
    };

    let host = decode(host);
    if !is_valid_host(&host) {
        return Err(UrlError::BadHost(raw.to_string()));
    }
    let path = decode(path);
    let user = user.map(decode);
    let password = password.map(decode);

    let (dir, file) = split_dir_file(&path);
    let mut dir = simplify(&dir);
    if scheme == Scheme::Http && dir.starts_with('/') {
        dir.remove(0);
    }
    if dir.len() > 1 && dir.ends_with('/') {
        dir.pop();
    }

    let rec = UrlRecord::from_components(
        Components {
            scheme,
            host,
            port,
            user,
            password,
            dir,
            file,
            ftp_type,
        },
        set,
    );
    tracing::trace!(raw, canonical = %rec, "parsed url");
    Ok(rec)
}

/// A decoded host must stay a single path component when it becomes a
/// mirror directory.
fn is_valid_host(host: &str) -> bool {
    !host.is_empty() && host != "." && host != ".." && !host.contains(['/', '\\', '\0'])
}

/// Length of a `user[:password]@` segment at the start of `s`: an `@`
/// found before the first `/`.
fn userinfo_len(s: &[u8]) -> usize {
    for (i, &c) in s.iter().enumerate() {
        match c {
            b'/' => return 0,
            b'@' => return i + 1,
            _ => {}
        }
    }
    0
}

/// User and password from the authority. The user ends at the first `:`,
/// the password runs from there to the `@`.
fn parse_userinfo(url: &str) -> (Option<&str>, Option<&str>) {
    let start = scheme_len(url);
    if start == 0 {
        return (None, None);
    }
    let rest = &url[start..];
    let at = match rest.as_bytes().iter().position(|&c| c == b'/' || c == b'@') {
        Some(p) if rest.as_bytes()[p] == b'@' => p,
        _ => return (None, None),
    };
    let info = &rest[..at];
    match info.find(':') {
        Some(colon) => (Some(&info[..colon]), Some(&info[colon + 1..])),
        None => (Some(info), None),
    }
}

/// Splits a trailing `;type=X` off an FTP path, returning the remaining path
/// and the type byte. The suffix must be exactly seven bytes long.
fn strip_ftp_type(path: &str) -> (&str, Option<u8>) {
    let b = path.as_bytes();
    let n = b.len();
    if n >= 7 && &b[n - 7..n - 1] == b";type=" {
        (&path[..n - 7], Some(b[n - 1]))
    } else {
        (path, None)
    }
}

/// True iff both strings parse and denote the same resource.
pub fn url_equal(a: &str, b: &str) -> bool {
    match (parse_url(a, false), parse_url(b, false)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
