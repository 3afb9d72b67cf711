//! Mirror session: the canonical URL → local name table shared by all
//! workers of one mirroring run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::alias::{HostAliasResolver, IdentityAliases};
use super::fs::{create_placeholder, probe, Occupant};
use super::layout::candidate_name;
use super::{LayoutConfig, LocalNames, MapError};
use crate::scan::LinkOccurrence;
use crate::url_model::{parse_url_with, UnsafeSet, UrlRecord};

/// Where a mapped URL was first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOrigin {
    /// Canonical URL of the referring document.
    pub document: String,
    /// Byte offset of the link in that document.
    pub offset: usize,
}

/// One row of the session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPathEntry {
    pub canonical: String,
    /// Path relative to the session root.
    pub local: String,
    pub origin: Option<LinkOrigin>,
}

#[derive(Debug, Default)]
struct Table {
    by_url: BTreeMap<String, LocalPathEntry>,
    claimed: BTreeSet<String>,
}

/// Assigns local names for one mirroring run.
///
/// Each distinct canonical URL gets exactly one local name, and no two URLs
/// share one. Lookup, collision probing, placeholder creation and
/// registration happen under a single lock, so concurrent workers can share
/// one session through an `Arc`.
pub struct MirrorSession {
    root: PathBuf,
    layout: LayoutConfig,
    unsafe_set: UnsafeSet,
    aliases: Box<dyn HostAliasResolver + Send + Sync>,
    table: Mutex<Table>,
}

impl MirrorSession {
    /// Session writing under `root`, with no host aliases and the platform's
    /// unsafe-character set.
    pub fn new(root: impl Into<PathBuf>, layout: LayoutConfig) -> Self {
        Self {
            root: root.into(),
            layout,
            unsafe_set: UnsafeSet::platform_default(),
            aliases: Box::new(IdentityAliases),
            table: Mutex::new(Table::default()),
        }
    }

    pub fn with_aliases(mut self, aliases: impl HostAliasResolver + Send + Sync + 'static) -> Self {
        self.aliases = Box::new(aliases);
        self
    }

    /// Set used to parse link URLs in [`mark_retrieved`](Self::mark_retrieved).
    pub fn with_unsafe_set(mut self, set: UnsafeSet) -> Self {
        self.unsafe_set = set;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// A panicking holder leaves at most a claimed name without a row, so a
    /// poisoned table is still usable.
    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local name for `url`, assigning one on first sight.
    pub fn map(&self, url: &UrlRecord) -> Result<String, MapError> {
        self.register(url, None)
    }

    /// Like [`map`](Self::map), recording the document and link it came from.
    pub fn map_link(
        &self,
        url: &UrlRecord,
        document: &UrlRecord,
        occurrence: &LinkOccurrence,
    ) -> Result<String, MapError> {
        let origin = LinkOrigin {
            document: document.canonical().to_string(),
            offset: occurrence.offset,
        };
        self.register(url, Some(origin))
    }

    fn register(&self, url: &UrlRecord, origin: Option<LinkOrigin>) -> Result<String, MapError> {
        let mut table = self.lock();
        if let Some(entry) = table.by_url.get(url.canonical()) {
            return Ok(entry.local.clone());
        }

        let candidate = candidate_name(url, &self.layout, self.aliases.as_ref());
        let local = self.choose(&table, candidate)?;
        if self.layout.create_placeholders {
            create_placeholder(&self.root, &local)?;
        }

        tracing::debug!(url = %url, local = %local, "mapped");
        table.claimed.insert(local.clone());
        table.by_url.insert(
            url.canonical().to_string(),
            LocalPathEntry {
                canonical: url.canonical().to_string(),
                local: local.clone(),
                origin,
            },
        );
        Ok(local)
    }

    /// First free name among `candidate`, `candidate.1`, `candidate.2`, ...
    ///
    /// The candidate itself is kept when nobody in the session claimed it and
    /// it is absent on disk, or is a plain file and overwriting is allowed.
    /// Numbered names must be absent on disk and unclaimed.
    fn choose(&self, table: &Table, candidate: String) -> Result<String, MapError> {
        if !table.claimed.contains(&candidate) {
            match probe(&self.root, &candidate)? {
                None => return Ok(candidate),
                Some(Occupant::File) if !self.layout.avoid_overwrite => return Ok(candidate),
                Some(_) => {}
            }
        }
        let mut n: u32 = 1;
        loop {
            let name = format!("{candidate}.{n}");
            if !table.claimed.contains(&name) && probe(&self.root, &name)?.is_none() {
                return Ok(name);
            }
            n += 1;
        }
    }

    /// Local name already assigned to a canonical URL.
    pub fn lookup(&self, canonical: &str) -> Option<String> {
        self.lock().by_url.get(canonical).map(|e| e.local.clone())
    }

    pub fn entry(&self, canonical: &str) -> Option<LocalPathEntry> {
        self.lock().by_url.get(canonical).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, ordered by canonical URL.
    pub fn entries(&self) -> Vec<LocalPathEntry> {
        self.lock().by_url.values().cloned().collect()
    }

    /// Copy of the table as canonical URL → local name.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock()
            .by_url
            .iter()
            .map(|(k, v)| (k.clone(), v.local.clone()))
            .collect()
    }

    /// Absolute path of a local name.
    pub fn local_path(&self, local: &str) -> PathBuf {
        self.root.join(local)
    }

    /// Marks every occurrence whose URL has a local name for conversion.
    /// Returns how many were marked.
    pub fn mark_retrieved(&self, occurrences: &mut [LinkOccurrence]) -> usize {
        let mut marked = 0;
        for occ in occurrences.iter_mut() {
            let Ok(url) = parse_url_with(&occ.url, false, self.unsafe_set) else {
                continue;
            };
            if let Some(local) = self.lookup(url.canonical()) {
                occ.mark_for_conversion(local);
                marked += 1;
            }
        }
        marked
    }
}

impl LocalNames for MirrorSession {
    fn local_name(&self, canonical: &str) -> Option<String> {
        self.lookup(canonical)
    }
}
