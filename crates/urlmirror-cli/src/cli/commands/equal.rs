//! `urlmirror equal <a> <b>` – compare two URLs by canonical form.

use anyhow::{Context, Result};
use urlmirror_core::config::MirrorConfig;
use urlmirror_core::url_model::parse_url_with;

pub fn run_equal(cfg: &MirrorConfig, a: &str, b: &str) -> Result<()> {
    let ua = parse_url_with(a, false, cfg.unsafe_chars).with_context(|| format!("parsing {a}"))?;
    let ub = parse_url_with(b, false, cfg.unsafe_chars).with_context(|| format!("parsing {b}"))?;
    if ua == ub {
        println!("same: {ua}");
    } else {
        println!("different:\n  {ua}\n  {ub}");
    }
    Ok(())
}
