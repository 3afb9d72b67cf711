//! `urlmirror links <file>` – list links found in a document.

use anyhow::{Context, Result};
use std::path::Path;
use urlmirror_core::config::MirrorConfig;
use urlmirror_core::scan::{scan_html, scan_plain, AttrTokenizer, LinkOccurrence};

fn flags(occ: &LinkOccurrence) -> &'static str {
    match (occ.flags.relative, occ.flags.no_scheme) {
        (true, _) => "rel",
        (false, true) => "abs-path",
        (false, false) => "-",
    }
}

pub async fn run_links(
    cfg: &MirrorConfig,
    path: &Path,
    html: bool,
    url: Option<&str>,
    base: Option<String>,
    json: bool,
) -> Result<()> {
    let buf = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let links = if html {
        let mut options = cfg.scan.clone();
        if base.is_some() {
            options.base_href = base;
        }
        scan_html(&buf, url, &AttrTokenizer, &options)
    } else {
        scan_plain(&buf)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }
    if links.is_empty() {
        println!("No links found.");
        return Ok(());
    }
    println!("{:<8} {:<6} {:<8} {}", "OFFSET", "SIZE", "FLAGS", "URL");
    for occ in &links {
        println!("{:<8} {:<6} {:<8} {}", occ.offset, occ.size, flags(occ), occ.url);
    }
    Ok(())
}
