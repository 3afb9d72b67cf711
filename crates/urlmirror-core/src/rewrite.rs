//! Link conversion: turning links to retrieved resources into relative
//! references to their local copies.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mapper::LocalNames;
use crate::resolve::to_relative;
use crate::scan::LinkOccurrence;
use crate::url_model::{parse_url_with, UnsafeSet};

/// Suffix of the temporary file a converted document is written to before
/// it replaces the original.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum RewriteError {
    /// Occurrences overlap, are out of order, or reach past the buffer.
    /// This is a bug in whoever produced them.
    #[error("link at offset {offset} (size {size}) is out of order or outside the {len}-byte document")]
    Contract {
        offset: usize,
        size: usize,
        len: usize,
    },
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Copies `buffer`, replacing each convertible link with the path from
/// `document_local` to the link's local file.
///
/// A link is converted when it was marked for conversion, is not already
/// relative, and its URL has an entry in `table`. Everything else is copied
/// byte for byte.
pub fn rewrite(
    buffer: &[u8],
    document_local: &str,
    occurrences: &[LinkOccurrence],
    table: &dyn LocalNames,
    set: UnsafeSet,
) -> Result<Vec<u8>, RewriteError> {
    let mut out = Vec::with_capacity(buffer.len());
    let mut cursor = 0;
    let mut prev_end = 0;
    let mut converted = 0;

    for occ in occurrences {
        if occ.offset < prev_end || occ.end() > buffer.len() {
            return Err(RewriteError::Contract {
                offset: occ.offset,
                size: occ.size,
                len: buffer.len(),
            });
        }
        out.extend_from_slice(&buffer[cursor..occ.offset]);
        cursor = occ.offset;
        prev_end = occ.end();

        if !occ.is_marked_for_conversion() || occ.flags.relative {
            continue;
        }
        let Some(target) = parse_url_with(&occ.url, false, set)
            .ok()
            .and_then(|u| table.local_name(u.canonical()))
        else {
            continue;
        };
        let relative = to_relative(document_local, &target);
        tracing::debug!(url = %occ.url, to = %relative, "converting link");
        out.extend_from_slice(relative.as_bytes());
        cursor = occ.end();
        converted += 1;
    }
    out.extend_from_slice(&buffer[cursor..]);

    tracing::debug!(document = document_local, converted, "rewrote links");
    Ok(out)
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> RewriteError {
    let path = path.to_path_buf();
    move |source| RewriteError::Io {
        action,
        path,
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Converts the links of the document stored at `path` in place.
///
/// The rewritten document goes to `<path>.part` first and is then renamed
/// over the original.
pub fn convert_file(
    path: &Path,
    document_local: &str,
    occurrences: &[LinkOccurrence],
    table: &dyn LocalNames,
    set: UnsafeSet,
) -> Result<(), RewriteError> {
    tracing::info!("converting {}", path.display());
    let buffer = fs::read(path).map_err(io_error("cannot read", path))?;
    let converted = rewrite(&buffer, document_local, occurrences, table, set)?;

    let tmp = temp_path(path);
    fs::write(&tmp, &converted).map_err(io_error("cannot write", &tmp))?;
    fs::rename(&tmp, path).map_err(io_error("cannot replace", path))?;
    tracing::info!("converting {} done", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::LinkFlags;
    use std::collections::BTreeMap;

    fn occ(offset: usize, size: usize, url: &str, relative: bool) -> LinkOccurrence {
        LinkOccurrence::new(
            offset,
            size,
            url.to_string(),
            LinkFlags {
                relative,
                no_scheme: relative,
            },
        )
    }

    fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn converts_marked_absolute_links() {
        let doc = br#"<a href="http://h/x">x</a> <a href="http://h/a/y">y</a>"#;
        let mut occs = vec![occ(9, 10, "http://h/x", false), occ(36, 12, "http://h/a/y", false)];
        occs[0].mark_for_conversion("h/x");
        occs[1].mark_for_conversion("h/a/y");
        let t = table(&[("http://h:80/x", "h/x"), ("http://h:80/a/y", "h/a/y")]);
        let out = rewrite(doc, "h/a/b.html", &occs, &t, UnsafeSet::Posix).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<a href="../x">x</a> <a href="y">y</a>"#
        );
    }

    #[test]
    fn unmarked_relative_and_unknown_links_are_copied() {
        let doc = b"A http://h/x B y C http://h/z D";
        let mut occs = vec![
            occ(2, 10, "http://h/x", false),
            occ(15, 1, "http://h/y", true),
            occ(19, 10, "http://h/z", false),
        ];
        occs[1].mark_for_conversion("h/y");
        occs[2].mark_for_conversion("h/z");
        let t = table(&[("http://h:80/x", "h/x"), ("http://h:80/y", "h/y")]);
        let out = rewrite(doc, "h/i.html", &occs, &t, UnsafeSet::Posix).unwrap();
        assert_eq!(out, doc.to_vec());
    }

    #[test]
    fn no_occurrences_copies_everything() {
        let out = rewrite(b"plain", "i.html", &[], &table(&[]), UnsafeSet::Posix).unwrap();
        assert_eq!(out, b"plain");
    }

    #[test]
    fn overlapping_or_out_of_range_is_a_contract_error() {
        let t: BTreeMap<String, String> = BTreeMap::new();
        let overlapping = vec![occ(2, 5, "http://h/a", false), occ(4, 2, "http://h/b", false)];
        assert!(matches!(
            rewrite(b"0123456789", "i", &overlapping, &t, UnsafeSet::Posix),
            Err(RewriteError::Contract { offset: 4, .. })
        ));
        let outside = vec![occ(8, 5, "http://h/a", false)];
        assert!(matches!(
            rewrite(b"0123456789", "i", &outside, &t, UnsafeSet::Posix),
            Err(RewriteError::Contract { .. })
        ));
    }

    #[test]
    fn convert_file_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.html");
        fs::write(&path, "<img src=\"http://h/i.gif\">").unwrap();
        let mut occs = vec![occ(10, 14, "http://h/i.gif", false)];
        occs[0].mark_for_conversion("h/i.gif");
        let t = table(&[("http://h:80/i.gif", "h/i.gif")]);
        convert_file(&path, "h/d/b.html", &occs, &t, UnsafeSet::Posix).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<img src=\"../i.gif\">");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn convert_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(
            &dir.path().join("gone.html"),
            "gone.html",
            &[],
            &table(&[]),
            UnsafeSet::Posix,
        )
        .unwrap_err();
        assert!(matches!(err, RewriteError::Io { action: "cannot read", .. }));
    }
}
