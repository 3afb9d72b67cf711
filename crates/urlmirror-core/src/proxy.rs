//! Proxy selection for retrieval URLs.

use serde::{Deserialize, Serialize};

use crate::url_model::{parse_url_with, Scheme, UrlError, UrlRecord};

/// Proxy settings (the `[proxy]` section of the config file).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub http_proxy: Option<String>,
    pub ftp_proxy: Option<String>,
    /// Host suffixes reached directly.
    pub no_proxy: Vec<String>,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .or_else(|_| std::env::var(name.to_ascii_uppercase()))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

impl ProxyConfig {
    /// Fills unset values from `http_proxy`, `ftp_proxy` and `no_proxy` in
    /// the environment.
    pub fn with_env_fallback(mut self) -> Self {
        if self.http_proxy.is_none() {
            self.http_proxy = env_value("http_proxy");
        }
        if self.ftp_proxy.is_none() {
            self.ftp_proxy = env_value("ftp_proxy");
        }
        if self.no_proxy.is_empty() {
            if let Some(list) = env_value("no_proxy") {
                self.no_proxy = list
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
        self
    }

    /// Configured proxy for a scheme.
    pub fn proxy_for(&self, scheme: Scheme) -> Option<&str> {
        match scheme {
            Scheme::Http => self.http_proxy.as_deref(),
            Scheme::Ftp => self.ftp_proxy.as_deref(),
        }
    }
}

/// Whether `host` ends with one of the suffixes in `list` (ASCII case ignored).
pub fn no_proxy_match(host: &str, list: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    list.iter()
        .filter(|s| !s.is_empty())
        .any(|suffix| host.ends_with(&suffix.to_ascii_lowercase()))
}

/// Attaches the proxy `url` should be fetched through, if any. Returns
/// whether a proxy was attached.
///
/// Proxies are always spoken to over HTTP, so a proxy URL that parses as
/// anything else is rejected.
pub fn attach_proxy(url: &mut UrlRecord, config: &ProxyConfig) -> Result<bool, UrlError> {
    if no_proxy_match(url.host(), &config.no_proxy) {
        return Ok(false);
    }
    let Some(raw) = config.proxy_for(url.scheme()) else {
        return Ok(false);
    };
    let proxy = parse_url_with(raw, false, url.unsafe_set())?;
    if proxy.scheme() != Scheme::Http {
        return Err(UrlError::UnknownScheme(raw.to_string()));
    }
    tracing::debug!(url = %url, proxy = %proxy, "using proxy");
    url.set_proxy(Some(proxy));
    Ok(true)
}
