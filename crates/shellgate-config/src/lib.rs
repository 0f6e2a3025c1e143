//! Shellgate configuration system.
//!
//! TOML-based configuration for the terminal bridge server. Every section
//! uses serde defaults so partial configs work out of the box; environment
//! variables are layered on top of the file, and the result is validated
//! once at startup. The config is read-only for the rest of the process
//! lifetime.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shellgate_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_env_overrides, apply_process_env};
pub use schema::{
    GateConfig, GuardConfig, LogLevel, LoggingConfig, ServerConfig, TerminalConfig,
};

use shellgate_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, then apply `PORT` /
/// `SHELLGATE_HOST` from the process environment.
pub fn load_config() -> Result<GateConfig, ConfigError> {
    let mut config = toml_loader::load_default()?;
    apply_process_env(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Same as [`load_config`] but reads an explicit file.
pub fn load_config_from(path: &Path) -> Result<GateConfig, ConfigError> {
    let mut config = toml_loader::load_from_path(path)?;
    apply_process_env(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &GateConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
