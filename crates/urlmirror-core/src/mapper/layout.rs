//! Candidate local names, before collision handling.

use super::alias::HostAliasResolver;
use super::LayoutConfig;
use crate::url_model::{escape_local_component, escape_raw_bytes, UnsafeSet, UrlRecord};

/// Drops `n` leading segments from a slash-separated directory.
fn cut_leading_dirs(dir: &str, n: usize) -> &str {
    let mut rest = dir;
    for _ in 0..n {
        if rest.is_empty() {
            break;
        }
        rest = match rest.find('/') {
            Some(p) => &rest[p + 1..],
            None => "",
        };
    }
    rest
}

fn has_prefix(layout: &LayoutConfig) -> bool {
    !layout.dir_prefix.is_empty() && layout.dir_prefix != "."
}

/// Directory part of the local name.
fn local_dir(url: &UrlRecord, layout: &LayoutConfig, aliases: &dyn HostAliasResolver) -> String {
    let mut dir = String::new();
    if layout.dir_struct {
        let url_dir = url.dir().strip_prefix('/').unwrap_or(url.dir());
        let url_dir = cut_leading_dirs(url_dir, layout.cut_dirs);
        if layout.add_host_dir {
            dir.push_str(&aliases.real_host(url.host()));
        }
        if !url_dir.is_empty() {
            if !dir.is_empty() {
                dir.push('/');
            }
            dir.push_str(url_dir);
        }
        dir = escape_local_component(&dir, url.unsafe_set());
    }
    if has_prefix(layout) {
        let prefix = layout.dir_prefix.trim_end_matches('/');
        dir = if dir.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}/{dir}")
        };
    }
    if dir.len() > 1 && dir.ends_with('/') {
        dir.pop();
    }
    dir
}

/// Local name a URL would get if nothing were in the way.
///
/// In directory-structure mode this is `[prefix/][host/]dir/file`, with
/// `cut_dirs` leading directories removed; otherwise `[prefix/]file`. A URL
/// naming a directory gets the configured default page as its file.
pub fn candidate_name(
    url: &UrlRecord,
    layout: &LayoutConfig,
    aliases: &dyn HostAliasResolver,
) -> String {
    let file = if url.file().is_empty() {
        layout.default_page.clone()
    } else {
        escape_raw_bytes(url.file())
    };
    let dir = local_dir(url, layout, aliases);
    let name = if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    };
    match url.unsafe_set() {
        UnsafeSet::Windows => name.replace('%', "@"),
        UnsafeSet::Posix => name,
    }
}
