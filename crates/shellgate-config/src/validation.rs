//! Full configuration validation.
//!
//! Collects every problem into a single `ConfigError` so an operator sees
//! all of them at once.

use crate::schema::GateConfig;
use shellgate_common::ConfigError;

const GEOMETRY_MIN: u16 = 1;
const GEOMETRY_MAX: u16 = 1000;
const QUEUE_MAX: usize = 65_536;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GateConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_terminal(&mut errors, config);
    validate_guard(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &GateConfig) {
    let server = &config.server;
    if server.bind_addr().is_err() {
        errors.push(format!(
            "server.host = {:?} is not an IP address",
            server.host
        ));
    }
    validate_path(errors, "server.path", &server.path);
    validate_path(errors, "server.health_path", &server.health_path);
    if server.path == server.health_path {
        errors.push(format!(
            "server.path and server.health_path are both {:?}",
            server.path
        ));
    }
}

fn validate_path(errors: &mut Vec<String>, name: &str, path: &str) {
    if !path.starts_with('/') {
        errors.push(format!("{name} = {path:?} must start with '/'"));
    }
    if path.chars().any(char::is_whitespace) {
        errors.push(format!("{name} = {path:?} must not contain whitespace"));
    }
}

fn validate_terminal(errors: &mut Vec<String>, config: &GateConfig) {
    let term = &config.terminal;
    validate_range(errors, "terminal.cols", term.cols, GEOMETRY_MIN, GEOMETRY_MAX);
    validate_range(errors, "terminal.rows", term.rows, GEOMETRY_MIN, GEOMETRY_MAX);
    if term.output_queue_frames == 0 || term.output_queue_frames > QUEUE_MAX {
        errors.push(format!(
            "terminal.output_queue_frames = {} is out of range [1, {QUEUE_MAX}]",
            term.output_queue_frames
        ));
    }
}

fn validate_guard(errors: &mut Vec<String>, config: &GateConfig) {
    for (name, list) in [
        ("guard.extra_blocked", &config.guard.extra_blocked),
        ("guard.extra_confirm", &config.guard.extra_confirm),
    ] {
        if list.iter().any(|p| p.trim().is_empty()) {
            errors.push(format!("{name} must not contain empty patterns"));
        }
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u16, min: u16, max: u16) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&GateConfig::default()).is_ok());
    }

    #[test]
    fn catches_zero_cols() {
        let mut config = GateConfig::default();
        config.terminal.cols = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("terminal.cols"));
    }

    #[test]
    fn catches_rows_too_large() {
        let mut config = GateConfig::default();
        config.terminal.rows = 5000;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("terminal.rows"));
    }

    #[test]
    fn catches_zero_queue() {
        let mut config = GateConfig::default();
        config.terminal.output_queue_frames = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("terminal.output_queue_frames"));
    }

    #[test]
    fn catches_relative_path() {
        let mut config = GateConfig::default();
        config.server.path = "terminal".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("server.path"));
    }

    #[test]
    fn catches_colliding_paths() {
        let mut config = GateConfig::default();
        config.server.health_path = "/terminal".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("both"));
    }

    #[test]
    fn catches_bad_host() {
        let mut config = GateConfig::default();
        config.server.host = "not an ip".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("server.host"));
    }

    #[test]
    fn catches_empty_guard_pattern() {
        let mut config = GateConfig::default();
        config.guard.extra_confirm = vec!["kubectl delete".into(), " ".into()];
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("guard.extra_confirm"));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = GateConfig::default();
        config.terminal.cols = 0;
        config.terminal.rows = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("terminal.cols"));
        assert!(err.contains("terminal.rows"));
        assert!(err.contains("; "));
    }
}
