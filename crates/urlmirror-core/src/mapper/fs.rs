//! Filesystem probing and directory creation for local names.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::MapError;

/// What occupies a path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Occupant {
    File,
    Dir,
}

fn io_error(path: &Path, source: io::Error) -> MapError {
    MapError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// `root/name`, provided `name` stays below `root`: only plain components
/// and `.` are allowed.
fn join_below(root: &Path, name: &str) -> Result<PathBuf, MapError> {
    let contained = Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        return Err(MapError::OutsideRoot(name.to_string()));
    }
    Ok(root.join(name))
}

/// True if some ancestor of `path` below `root` is a plain file, which makes
/// `path` unreachable rather than broken.
fn blocked_by_file(root: &Path, path: &Path) -> bool {
    path.ancestors()
        .skip(1)
        .take_while(|a| a.starts_with(root) && *a != root)
        .any(|a| fs::metadata(a).map(|m| !m.is_dir()).unwrap_or(false))
}

/// Probes `root/name`. A missing path, or one shadowed by a plain file higher
/// up, is free; any other failure is an error.
pub(crate) fn probe(root: &Path, name: &str) -> Result<Option<Occupant>, MapError> {
    let path = join_below(root, name)?;
    match fs::metadata(&path) {
        Ok(md) if md.is_dir() => Ok(Some(Occupant::Dir)),
        Ok(_) => Ok(Some(Occupant::File)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            if blocked_by_file(root, &path) {
                Ok(None)
            } else {
                Err(io_error(&path, e))
            }
        }
    }
}

/// Creates every missing directory between `root` and the parent of
/// `root/name`. A plain file standing where a directory is needed is removed
/// first. Names that would leave `root` are refused.
pub fn make_parent_dirs(root: &Path, name: &str) -> Result<PathBuf, MapError> {
    let path = join_below(root, name)?;
    let Some(parent) = path.parent() else {
        return Ok(path);
    };
    let mut partial = root.to_path_buf();
    for component in parent.strip_prefix(root).unwrap_or(parent).components() {
        partial.push(component);
        match fs::metadata(&partial) {
            Ok(md) if md.is_dir() => {}
            Ok(_) => {
                tracing::debug!(path = %partial.display(), "removing file in the way of a directory");
                fs::remove_file(&partial).map_err(|e| io_error(&partial, e))?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&partial, e)),
        }
    }
    fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    Ok(path)
}

/// Reserves `root/name` with an empty file, keeping any existing content.
pub(crate) fn create_placeholder(root: &Path, name: &str) -> Result<(), MapError> {
    let path = make_parent_dirs(root, name)?;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|e| io_error(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_reports_kind() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();
        fs::write(dir.path().join("f"), b"x").unwrap();
        assert_eq!(probe(dir.path(), "d").unwrap(), Some(Occupant::Dir));
        assert_eq!(probe(dir.path(), "f").unwrap(), Some(Occupant::File));
        assert_eq!(probe(dir.path(), "missing").unwrap(), None);
    }

    #[test]
    fn probe_below_a_file_is_free() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("f"), b"x").unwrap();
        assert_eq!(probe(dir.path(), "f/inner.html").unwrap(), None);
    }

    #[test]
    fn make_parent_dirs_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = make_parent_dirs(dir.path(), "h/a/b/c.html").unwrap();
        assert!(dir.path().join("h/a/b").is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn make_parent_dirs_replaces_file_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("h")).unwrap();
        fs::write(dir.path().join("h/a"), b"old").unwrap();
        make_parent_dirs(dir.path(), "h/a/x.html").unwrap();
        assert!(dir.path().join("h/a").is_dir());
    }

    #[test]
    fn names_leaving_the_root_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("mirror");
        fs::create_dir(&root).unwrap();
        fs::write(dir.path().join("victim.txt"), b"keep").unwrap();

        for name in ["../victim.txt/z", "h/../../victim.txt/z", "/etc/passwd"] {
            assert!(matches!(
                make_parent_dirs(&root, name),
                Err(MapError::OutsideRoot(_))
            ));
            assert!(matches!(probe(&root, name), Err(MapError::OutsideRoot(_))));
            assert!(matches!(
                create_placeholder(&root, name),
                Err(MapError::OutsideRoot(_))
            ));
        }
        assert_eq!(fs::read(dir.path().join("victim.txt")).unwrap(), b"keep");
        assert!(make_parent_dirs(&root, "./h/x.html").is_ok());
    }

    #[test]
    fn placeholder_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("p.html"), b"body").unwrap();
        create_placeholder(dir.path(), "p.html").unwrap();
        assert_eq!(fs::read(dir.path().join("p.html")).unwrap(), b"body");
        create_placeholder(dir.path(), "n/q.html").unwrap();
        assert_eq!(fs::read(dir.path().join("n/q.html")).unwrap(), b"");
    }
}
