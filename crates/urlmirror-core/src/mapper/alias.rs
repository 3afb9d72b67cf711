//! Host aliasing: mapping the host a URL names to the host's true name, so
//! that `www.example.org` and `example.org` share one mirror directory.

use std::collections::BTreeMap;

/// Resolves a host name to its true (canonical) name.
pub trait HostAliasResolver {
    fn real_host(&self, host: &str) -> String;
}

/// Every host is its own true name.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAliases;

impl HostAliasResolver for IdentityAliases {
    fn real_host(&self, host: &str) -> String {
        host.to_string()
    }
}

/// Fixed alias table (the `[host_aliases]` config section). Lookups ignore
/// ASCII case; unknown hosts map to themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticAliases {
    aliases: BTreeMap<String, String>,
}

impl StaticAliases {
    pub fn new(aliases: &BTreeMap<String, String>) -> Self {
        Self {
            aliases: aliases
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
                .collect(),
        }
    }
}

impl HostAliasResolver for StaticAliases {
    fn real_host(&self, host: &str) -> String {
        self.aliases
            .get(&host.to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_aliases_ignore_case() {
        let mut map = BTreeMap::new();
        map.insert("WWW.Example.org".to_string(), "example.org".to_string());
        let aliases = StaticAliases::new(&map);
        assert_eq!(aliases.real_host("www.example.ORG"), "example.org");
        assert_eq!(aliases.real_host("other"), "other");
    }

    #[test]
    fn identity() {
        assert_eq!(IdentityAliases.real_host("h"), "h");
    }
}
