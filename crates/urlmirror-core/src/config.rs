use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::mapper::{LayoutConfig, MirrorSession, StaticAliases};
use crate::proxy::ProxyConfig;
use crate::scan::ScanOptions;
use crate::url_model::UnsafeSet;

/// Global configuration loaded from `~/.config/urlmirror/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Characters escaped in URLs and local names: "posix" or "windows".
    /// Defaults to the running platform.
    #[serde(default)]
    pub unsafe_chars: UnsafeSet,
    /// Local layout of mirrored files.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// HTML link scanning.
    #[serde(default)]
    pub scan: ScanOptions,
    /// Proxies; unset entries fall back to the environment.
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Host → true host name, so aliases share one mirror directory.
    #[serde(default)]
    pub host_aliases: BTreeMap<String, String>,
}

impl MirrorConfig {
    /// A mirror session rooted at `root` using this configuration.
    pub fn session(&self, root: impl Into<PathBuf>) -> MirrorSession {
        MirrorSession::new(root, self.layout.clone())
            .with_unsafe_set(self.unsafe_chars)
            .with_aliases(StaticAliases::new(&self.host_aliases))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlmirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<MirrorConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: MirrorConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MirrorConfig::default();
        assert_eq!(cfg.unsafe_chars, UnsafeSet::platform_default());
        assert!(!cfg.layout.dir_struct);
        assert!(cfg.scan.http_relative_tolerance);
        assert!(cfg.scan.base_href.is_none());
        assert!(cfg.proxy.no_proxy.is_empty());
        assert!(cfg.host_aliases.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MirrorConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.unsafe_chars, cfg.unsafe_chars);
        assert_eq!(parsed.layout.default_page, cfg.layout.default_page);
        assert_eq!(parsed.layout.avoid_overwrite, cfg.layout.avoid_overwrite);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: MirrorConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.layout.dir_prefix, ".");
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            unsafe_chars = "windows"

            [layout]
            dir_struct = true
            cut_dirs = 1
            dir_prefix = "mirror"

            [scan]
            base_href = "http://example.org/"
            http_relative_tolerance = false

            [proxy]
            http_proxy = "http://proxy:3128/"
            no_proxy = [".lan"]

            [host_aliases]
            "www.example.org" = "example.org"
        "#;
        let cfg: MirrorConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.unsafe_chars, UnsafeSet::Windows);
        assert!(cfg.layout.dir_struct);
        assert_eq!(cfg.layout.cut_dirs, 1);
        assert_eq!(cfg.layout.default_page, "index.html");
        assert_eq!(cfg.scan.base_href.as_deref(), Some("http://example.org/"));
        assert!(!cfg.scan.http_relative_tolerance);
        assert_eq!(cfg.proxy.no_proxy, vec![".lan".to_string()]);
        assert_eq!(
            cfg.host_aliases.get("www.example.org").map(String::as_str),
            Some("example.org")
        );
    }

    #[test]
    fn session_uses_aliases_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = MirrorConfig::default();
        cfg.unsafe_chars = UnsafeSet::Posix;
        cfg.layout.dir_struct = true;
        cfg.layout.create_placeholders = false;
        cfg.host_aliases
            .insert("www.h".to_string(), "h".to_string());
        let session = cfg.session(dir.path());
        let url = crate::url_model::parse_url_with("http://www.h/a/b", false, UnsafeSet::Posix)
            .unwrap();
        assert_eq!(session.map(&url).unwrap(), "h/a/b");
    }

    #[test]
    fn load_from_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "layout = 3").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
        fs::write(&path, "[layout]\ncut_dirs = 2\n").unwrap();
        assert_eq!(load_from(&path).unwrap().layout.cut_dirs, 2);
    }
}
