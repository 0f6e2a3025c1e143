use serde::{Deserialize, Serialize};

/// Additions to the built-in command guard pattern sets.
///
/// Extras are appended after the built-in entries; the built-ins cannot be
/// removed from config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Substrings that block a chunk wherever they appear.
    pub extra_blocked: Vec<String>,
    /// Prefixes that flag a chunk as needing confirmation.
    pub extra_confirm: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_config_from_toml() {
        let toml_str = r#"
extra_blocked = ["shutdown -h now"]
extra_confirm = ["kubectl delete"]
"#;
        let config: GuardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.extra_blocked, vec!["shutdown -h now"]);
        assert_eq!(config.extra_confirm, vec!["kubectl delete"]);
    }
}
