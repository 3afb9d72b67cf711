//! `urlmirror convert <url>` – make an already-mirrored document browsable
//! offline by pointing its links at the local copies.

use anyhow::{Context, Result};
use std::path::PathBuf;
use urlmirror_core::config::MirrorConfig;
use urlmirror_core::rewrite::convert_file;
use urlmirror_core::scan::{scan_html, AttrTokenizer};
use urlmirror_core::url_model::parse_url_with;

pub async fn run_convert(cfg: &MirrorConfig, url: &str, root: PathBuf) -> Result<()> {
    // The mirror already exists: reuse names as they are, create nothing.
    let mut cfg = cfg.clone();
    cfg.layout.create_placeholders = false;
    cfg.layout.avoid_overwrite = false;
    let session = cfg.session(root);
    let set = cfg.unsafe_chars;

    let document = parse_url_with(url, false, set).with_context(|| format!("parsing {url}"))?;
    let document_local = session.map(&document)?;
    let path = session.local_path(&document_local);
    let buf = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut links = scan_html(&buf, Some(document.canonical()), &AttrTokenizer, &cfg.scan);
    let mut present = 0;
    for occ in links.iter_mut() {
        let Ok(target) = parse_url_with(&occ.url, false, set) else {
            continue;
        };
        let local = session.map_link(&target, &document, occ)?;
        if session.local_path(&local).is_file() {
            occ.mark_for_conversion(local);
            present += 1;
        }
    }

    let table = session.snapshot();
    let total = links.len();
    tokio::task::spawn_blocking({
        let path = path.clone();
        move || convert_file(&path, &document_local, &links, &table, set)
    })
    .await
    .context("convert task join")??;

    println!("{}: {present} of {total} links point to local files", path.display());
    Ok(())
}
