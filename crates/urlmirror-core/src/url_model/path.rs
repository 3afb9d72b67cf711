//! Dot-segment and slash collapsing, and the directory/file split.

fn at(p: &[u8], i: usize) -> Option<u8> {
    p.get(i).copied()
}

/// Collapses a slash-separated path without touching the filesystem.
///
/// Leading `./` segments are dropped and leading `../` segments are reduced to
/// a single `/` anchor. Runs of `/` collapse to one, `./` segments disappear,
/// and `../` removes the segment before it. A trailing `/` (other than the
/// root) or `/.` is stripped. A path that becomes empty is `/`; an empty input
/// stays empty.
///
/// # Examples
///
/// - `simplify("a/./b//../c")` → `"a/c"`
/// - `simplify("../../x")` → `"/x"`
pub fn simplify(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut p = path.as_bytes().to_vec();

    let mut i = 0;
    let mut anchored = false;
    loop {
        if at(&p, i) == Some(b'.') && at(&p, i + 1) == Some(b'/') {
            i += 2;
        } else if at(&p, i) == Some(b'.')
            && at(&p, i + 1) == Some(b'.')
            && at(&p, i + 2) == Some(b'/')
        {
            i += 3;
            anchored = true;
        } else {
            break;
        }
    }
    if i > 0 {
        // keep the last `/` of a stripped `../` run as the anchor
        let cut = if anchored { i - 1 } else { i };
        p.drain(..cut);
    }
    if p == b"." || p == b".." {
        return "/".to_string();
    }

    let mut i = 0usize;
    while i < p.len() {
        while i < p.len() && p[i] != b'/' {
            i += 1;
        }
        let mut start = i as isize;
        i += 1;
        if start as usize >= p.len() {
            break;
        }

        while at(&p, i) == Some(b'/') {
            i += 1;
        }
        if start as usize + 1 != i {
            p.drain(start as usize + 1..i);
            i = start as usize + 1;
        }

        if start != 0 && i >= p.len() {
            p.truncate(i - 1);
            break;
        }

        if at(&p, i) == Some(b'.') {
            match at(&p, i + 1) {
                None => {
                    p.truncate(i - 1);
                    break;
                }
                Some(b'/') => {
                    p.remove(i);
                    i = start as usize;
                    continue;
                }
                Some(b'.') if matches!(at(&p, i + 2), None | Some(b'/')) => {
                    start -= 1;
                    while start > -1 && p[start as usize] != b'/' {
                        start -= 1;
                    }
                    let from = (start + 1) as usize;
                    let to = (i + 2).min(p.len());
                    p.drain(from..to);
                    i = start.max(0) as usize;
                    continue;
                }
                _ => {}
            }
        }
    }

    if p.is_empty() {
        return "/".to_string();
    }
    // only ASCII bytes were removed, so the remainder is still valid UTF-8
    String::from_utf8(p).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn is_dot_segment(s: &str) -> bool {
    s == "." || s == ".."
}

/// Splits a decoded path into directory and file at the last `/`.
///
/// A final segment of exactly `.` or `..` keeps the whole path as the
/// directory with an empty file.
pub fn split_dir_file(path: &str) -> (String, String) {
    match path.rfind('/') {
        None => {
            if is_dot_segment(path) {
                (path.to_string(), String::new())
            } else {
                (String::new(), path.to_string())
            }
        }
        Some(0) => {
            let rest = &path[1..];
            if is_dot_segment(rest) {
                (path.to_string(), String::new())
            } else {
                ("/".to_string(), rest.to_string())
            }
        }
        Some(i) => {
            let rest = &path[i + 1..];
            if is_dot_segment(rest) {
                (path.to_string(), String::new())
            } else {
                (path[..i].to_string(), rest.to_string())
            }
        }
    }
}
