use serde::{Deserialize, Serialize};

/// Per-session terminal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Initial PTY columns (valid range: 1-1000).
    pub cols: u16,
    /// Initial PTY rows (valid range: 1-1000).
    pub rows: u16,
    /// Outbound frames queued per session before output is dropped
    /// (valid range: 1-65536).
    pub output_queue_frames: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 30,
            output_queue_frames: 4096,
        }
    }
}
