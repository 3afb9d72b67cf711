//! `urlmirror local <url>...` – show where URLs would be stored.

use anyhow::{Context, Result};
use std::path::PathBuf;
use urlmirror_core::config::MirrorConfig;
use urlmirror_core::url_model::parse_url_with;

pub fn run_local(cfg: &MirrorConfig, urls: &[String], root: PathBuf) -> Result<()> {
    let mut cfg = cfg.clone();
    cfg.layout.create_placeholders = false;
    let session = cfg.session(root);
    for raw in urls {
        let url = parse_url_with(raw, false, cfg.unsafe_chars)
            .with_context(|| format!("parsing {raw}"))?;
        let local = session.map(&url)?;
        println!("{url} -> {local}");
    }
    Ok(())
}
