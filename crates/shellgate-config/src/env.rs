//! Environment variable overrides layered on top of the config file.

use crate::schema::GateConfig;
use tracing::{info, warn};

/// Port override, as understood by most PaaS hosts.
pub const PORT_VAR: &str = "PORT";

/// Bind address override.
pub const HOST_VAR: &str = "SHELLGATE_HOST";

/// Apply overrides from an arbitrary variable source.
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides<F>(config: &mut GateConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(PORT_VAR) {
        match raw.trim().parse::<u16>() {
            Ok(port) => {
                info!("port overridden by ${PORT_VAR}: {port}");
                config.server.port = port;
            }
            Err(e) => warn!("ignoring ${PORT_VAR}={raw:?}: {e}"),
        }
    }

    if let Some(host) = lookup(HOST_VAR) {
        let host = host.trim();
        if host.is_empty() {
            warn!("ignoring empty ${HOST_VAR}");
        } else {
            info!("host overridden by ${HOST_VAR}: {host}");
            config.server.host = host.to_string();
        }
    }
}

/// Apply overrides from the process environment.
pub fn apply_process_env(config: &mut GateConfig) {
    apply_env_overrides(config, |key| std::env::var(key).ok());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn port_override_applies() {
        let mut config = GateConfig::default();
        apply_env_overrides(&mut config, source(&[("PORT", "8081")]));
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = GateConfig::default();
        apply_env_overrides(&mut config, source(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3001);

        apply_env_overrides(&mut config, source(&[("PORT", "70000")]));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn host_override_applies() {
        let mut config = GateConfig::default();
        apply_env_overrides(&mut config, source(&[("SHELLGATE_HOST", " 127.0.0.1 ")]));
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn empty_host_is_ignored() {
        let mut config = GateConfig::default();
        apply_env_overrides(&mut config, source(&[("SHELLGATE_HOST", "  ")]));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn no_vars_changes_nothing() {
        let mut config = GateConfig::default();
        apply_env_overrides(&mut config, source(&[]));
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
