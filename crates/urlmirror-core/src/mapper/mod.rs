//! Local name mapping: which file on disk holds which URL.
//!
//! A [`MirrorSession`] owns the table for one run. Names are derived from the
//! URL by the [`LayoutConfig`] rules, then numbered (`name.1`, `name.2`, ...)
//! when something else already holds the candidate.

mod alias;
mod fs;
mod layout;
mod session;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub use alias::{HostAliasResolver, IdentityAliases, StaticAliases};
pub use fs::make_parent_dirs;
pub use layout::candidate_name;
pub use session::{LinkOrigin, LocalPathEntry, MirrorSession};

/// How URLs are laid out on disk (the `[layout]` section of the config file).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Recreate the remote directory tree instead of saving files flat.
    pub dir_struct: bool,
    /// In tree mode, put everything under a directory named after the host.
    pub add_host_dir: bool,
    /// Number of leading remote directories to drop in tree mode.
    pub cut_dirs: usize,
    /// Directory all names are placed under; `.` means none.
    pub dir_prefix: String,
    /// Number files instead of reusing a name that already exists on disk.
    pub avoid_overwrite: bool,
    /// File name for URLs that name a directory.
    pub default_page: String,
    /// Create an empty file for each assigned name before releasing the lock.
    pub create_placeholders: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dir_struct: false,
            add_host_dir: true,
            cut_dirs: 0,
            dir_prefix: ".".to_string(),
            avoid_overwrite: true,
            default_page: "index.html".to_string(),
            create_placeholders: true,
        }
    }
}

/// Failure to assign a local name.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The name has `..`, a root or a drive prefix in it.
    #[error("local name {0} leads outside the mirror root")]
    OutsideRoot(String),
}

/// Canonical URL → local name lookup, as needed by the rewriter.
pub trait LocalNames {
    fn local_name(&self, canonical: &str) -> Option<String>;
}

impl LocalNames for BTreeMap<String, String> {
    fn local_name(&self, canonical: &str) -> Option<String> {
        self.get(canonical).cloned()
    }
}
