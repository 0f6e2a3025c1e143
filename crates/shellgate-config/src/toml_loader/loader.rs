//! Reading the config file.

use std::path::Path;

use shellgate_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::GateConfig;
use crate::validation;

/// Read and parse one config file.
///
/// Fields the file leaves out take their defaults. A file that parses but
/// holds out-of-range values is not an error: the whole file is ignored
/// with a warning and the built-in defaults are used, so a bad edit never
/// keeps the server from starting.
pub fn load_from_path(path: &Path) -> Result<GateConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("cannot read {}: {e}", path.display())))?;
    let parsed: GateConfig = toml::from_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    match validation::validate(&parsed) {
        Ok(()) => {
            info!(path = %path.display(), "config loaded");
            Ok(parsed)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config rejected, using defaults");
            Ok(GateConfig::default())
        }
    }
}

/// Read the per-user config file, writing a commented template first if
/// there is none yet.
///
/// A template that cannot be written only costs a warning; the defaults
/// are returned either way.
pub fn load_default() -> Result<GateConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "no config file, writing template");
            if let Err(e) = create_default_config(&path) {
                warn!(error = %e, "template not written");
            }
            Ok(GateConfig::default())
        }
        loaded => loaded,
    }
}
