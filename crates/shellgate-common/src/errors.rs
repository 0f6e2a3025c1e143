use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures while bringing up or driving a pseudo-terminal process.
#[derive(Debug, thiserror::Error)]
pub enum PtyError {
    #[error("failed to open pty: {0}")]
    Open(String),

    #[error("failed to spawn shell '{shell}': {reason}")]
    Spawn { shell: String, reason: String },

    #[error("pty io error: {0}")]
    Io(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pty(#[from] PtyError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("terminal.cols = 0 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: terminal.cols = 0 is out of range"
        );
    }

    #[test]
    fn pty_error_display() {
        let err = PtyError::Spawn {
            shell: "/no/such/shell".into(),
            reason: "No such file or directory".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to spawn shell '/no/such/shell': No such file or directory"
        );

        let err = PtyError::Open("out of ptys".into());
        assert_eq!(err.to_string(), "failed to open pty: out of ptys");
    }

    #[test]
    fn gate_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GateError = config_err.into();
        assert!(matches!(err, GateError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn gate_error_from_pty() {
        let err: GateError = PtyError::Io("broken pipe".into()).into();
        assert!(matches!(err, GateError::Pty(_)));
        assert_eq!(err.to_string(), "pty io error: broken pipe");
    }

    #[test]
    fn gate_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: GateError = io_err.into();
        assert!(matches!(err, GateError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }

    #[test]
    fn gate_error_other_variants() {
        let err = GateError::Transport("connection reset".into());
        assert_eq!(err.to_string(), "transport error: connection reset");

        let err = GateError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
