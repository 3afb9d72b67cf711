//! `urlmirror canon <url>...` – print canonical URLs.

use anyhow::{bail, Result};
use urlmirror_core::config::MirrorConfig;
use urlmirror_core::proxy::attach_proxy;
use urlmirror_core::url_model::parse_url_with;

pub fn run_canon(cfg: &MirrorConfig, urls: &[String], strict: bool, hide_password: bool) -> Result<()> {
    let proxies = cfg.proxy.clone().with_env_fallback();
    let mut failed = 0;
    for raw in urls {
        let mut url = match parse_url_with(raw, strict, cfg.unsafe_chars) {
            Ok(u) => u,
            Err(e) => {
                eprintln!("{raw}: {e}");
                failed += 1;
                continue;
            }
        };
        let canonical = url.to_canonical_string(hide_password);
        match attach_proxy(&mut url, &proxies) {
            Ok(true) => {
                let via = url
                    .proxy()
                    .map(|p| p.to_canonical_string(hide_password))
                    .unwrap_or_default();
                println!("{canonical}  (via {via})");
            }
            Ok(false) => println!("{canonical}"),
            Err(e) => {
                tracing::warn!("proxy for {} unusable: {}", raw, e);
                println!("{canonical}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} URLs could not be parsed", urls.len());
    }
    Ok(())
}
