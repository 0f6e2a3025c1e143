//! PTY process types: spawn options, the owned process handle, and the
//! streams it produces.

use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;

use portable_pty::{ChildKiller, MasterPty, PtySize};
use tokio::sync::{mpsc, oneshot};

use crate::shell::{default_working_dir, shell_for, HostPlatform};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum bytes read from a PTY in one call (8 KB).
pub const PTY_READ_CHUNK: usize = 8_192;

/// Default terminal columns.
pub const DEFAULT_COLS: u16 = 80;

/// Default terminal rows.
pub const DEFAULT_ROWS: u16 = 30;

// =============================================================================
// OPTIONS
// =============================================================================

/// Everything needed to start one shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyOptions {
    /// Shell executable.
    pub shell: String,
    /// Working directory. `None` inherits the server's cwd.
    pub cwd: Option<PathBuf>,
    pub cols: u16,
    pub rows: u16,
}

impl PtyOptions {
    /// The host's platform shell in the home directory.
    pub fn for_host(cols: u16, rows: u16) -> Self {
        Self {
            shell: shell_for(HostPlatform::current()).to_string(),
            cwd: default_working_dir(),
            cols,
            rows,
        }
    }

    pub(crate) fn size(&self) -> PtySize {
        PtySize {
            rows: self.rows,
            cols: self.cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }
}

impl Default for PtyOptions {
    fn default() -> Self {
        Self::for_host(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

// =============================================================================
// PROCESS HANDLE
// =============================================================================

/// How the shell ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, if the wait itself succeeded.
    pub code: Option<u32>,
}

/// Channels the owner consumes while the process runs.
#[derive(Debug)]
pub struct PtyStreams {
    /// Output chunks in emission order. Closes at PTY EOF.
    pub output: mpsc::UnboundedReceiver<Vec<u8>>,
    /// Fires once when the child has been reaped.
    pub exit: oneshot::Receiver<ProcessExit>,
}

/// One live shell behind a PTY.
///
/// Owns the master side of the pair, the input queue feeding the writer
/// thread, and a killer for the child. Dropping the handle kills the
/// process.
pub struct PtyProcess {
    /// Input queue drained by the writer thread. `None` once killed.
    pub(crate) input_tx: Option<std_mpsc::Sender<Vec<u8>>>,
    /// Signals the child. `None` once used.
    pub(crate) killer: Option<Box<dyn ChildKiller + Send + Sync>>,
    /// Master PTY handle (for resize). Closing it hangs up the shell.
    pub(crate) master: Box<dyn MasterPty + Send>,
    pub(crate) pid: Option<u32>,
    pub(crate) size: PtySize,
    pub(crate) shell: String,
    pub(crate) cwd: Option<PathBuf>,
}

impl PtyProcess {
    /// OS process id of the shell, where the platform reports one.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Current geometry as `(cols, rows)`.
    pub fn size(&self) -> (u16, u16) {
        (self.size.cols, self.size.rows)
    }

    /// Whether [`PtyProcess::kill`] has already run.
    pub fn is_killed(&self) -> bool {
        self.killer.is_none()
    }
}

impl Drop for PtyProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

impl std::fmt::Debug for PtyProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyProcess")
            .field("pid", &self.pid)
            .field("shell", &self.shell)
            .field("cwd", &self.cwd)
            .field("cols", &self.size.cols)
            .field("rows", &self.size.rows)
            .field("killed", &self.is_killed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pty_constants_are_sane() {
        assert_eq!(PTY_READ_CHUNK, 8_192);
        assert_eq!(DEFAULT_COLS, 80);
        assert_eq!(DEFAULT_ROWS, 30);
    }

    #[test]
    fn default_options_use_host_shell() {
        let opts = PtyOptions::default();
        assert_eq!(opts.shell, shell_for(HostPlatform::current()));
        assert_eq!(opts.cwd, default_working_dir());
        assert_eq!((opts.cols, opts.rows), (DEFAULT_COLS, DEFAULT_ROWS));
    }

    #[test]
    fn options_size_has_no_pixels() {
        let size = PtyOptions::for_host(120, 40).size();
        assert_eq!((size.cols, size.rows), (120, 40));
        assert_eq!((size.pixel_width, size.pixel_height), (0, 0));
    }
}
