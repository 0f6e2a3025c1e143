//! Configuration schema types for Shellgate.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod guard;
mod logging;
mod server;
mod terminal;

pub use guard::*;
pub use logging::*;
pub use server::*;
pub use terminal::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the terminal bridge server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub server: ServerConfig,
    pub terminal: TerminalConfig,
    pub guard: GuardConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.path, "/terminal");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.guard.extra_blocked.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml_str = r#"
[server]
port = 9000

[terminal]
rows = 48
"#;
        let config: GateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.path, "/terminal");
        assert_eq!(config.terminal.rows, 48);
        assert_eq!(config.terminal.cols, 80);
    }
}
