//! Session types: lifecycle state, close causes, shared settings, summary.

use std::fmt;
use std::time::Duration;

use shellgate_common::SessionId;
use shellgate_config::GateConfig;
use shellgate_guard::{CommandGuard, PatternSet};
use shellgate_pty::PtyOptions;

/// Lifecycle of a session. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Spawning,
    Active,
    Closed,
}

/// What ended an active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseCause {
    /// The client sent a Close frame or the stream ended.
    ClientClosed,
    /// The connection failed mid-session.
    SocketError(String),
    /// The shell exited on its own.
    ProcessExited,
}

impl CloseCause {
    /// Whether the socket side went away first.
    pub fn is_socket_side(&self) -> bool {
        !matches!(self, CloseCause::ProcessExited)
    }
}

impl fmt::Display for CloseCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseCause::ClientClosed => write!(f, "client closed"),
            CloseCause::SocketError(e) => write!(f, "socket error: {e}"),
            CloseCause::ProcessExited => write!(f, "process exited"),
        }
    }
}

/// Read-only settings every session is built from.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub pty: PtyOptions,
    pub guard: CommandGuard,
    /// Outbound frames queued before output is dropped.
    pub output_queue_frames: usize,
}

impl SessionSettings {
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            pty: PtyOptions::for_host(config.terminal.cols, config.terminal.rows),
            guard: CommandGuard::new(PatternSet::with_extras(
                config.guard.extra_blocked.iter().cloned(),
                config.guard.extra_confirm.iter().cloned(),
            )),
            output_queue_frames: config.terminal.output_queue_frames.max(1),
        }
    }
}

/// Per-session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Bytes forwarded from the client to the shell.
    pub bytes_in: u64,
    /// Bytes of shell output queued for the client.
    pub bytes_out: u64,
    /// Input chunks the guard refused.
    pub blocked: u32,
    /// Input chunks forwarded with a confirmation flag.
    pub flagged: u32,
    /// Output frames dropped because the socket could not take them.
    pub dropped_frames: u32,
}

/// Final record of a session, logged when it closes.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: SessionId,
    pub cause: CloseCause,
    pub uptime: Duration,
    pub stats: SessionStats,
    pub exit_code: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_cause_sides() {
        assert!(CloseCause::ClientClosed.is_socket_side());
        assert!(CloseCause::SocketError("reset".into()).is_socket_side());
        assert!(!CloseCause::ProcessExited.is_socket_side());
    }

    #[test]
    fn close_cause_display() {
        assert_eq!(
            CloseCause::SocketError("reset".into()).to_string(),
            "socket error: reset"
        );
        assert_eq!(CloseCause::ProcessExited.to_string(), "process exited");
    }

    #[test]
    fn settings_follow_config() {
        let mut config = GateConfig::default();
        config.terminal.cols = 132;
        config.terminal.rows = 43;
        config.guard.extra_confirm = vec!["kubectl delete".into()];

        let settings = SessionSettings::from_config(&config);
        assert_eq!((settings.pty.cols, settings.pty.rows), (132, 43));
        assert_eq!(
            settings.guard.patterns().confirm().last().map(String::as_str),
            Some("kubectl delete")
        );
        assert_eq!(settings.output_queue_frames, 4096);
    }
}
