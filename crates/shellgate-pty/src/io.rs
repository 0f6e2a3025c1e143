//! PTY I/O operations: queue input, resize, kill.

use portable_pty::PtySize;
use shellgate_common::PtyError;

use crate::types::PtyProcess;

// =============================================================================
// INPUT (WRITE TO PTY)
// =============================================================================

impl PtyProcess {
    /// Queue raw input bytes for the shell.
    ///
    /// Never blocks: the writer thread performs the actual write, in queue
    /// order. Fails once the process has been killed or its writer has
    /// stopped.
    pub fn write_input(&self, data: &[u8]) -> Result<(), PtyError> {
        let tx = self
            .input_tx
            .as_ref()
            .ok_or_else(|| PtyError::Io("PTY input closed".into()))?;
        tx.send(data.to_vec())
            .map_err(|_| PtyError::Io("PTY writer has stopped".into()))
    }
}

// =============================================================================
// RESIZE
// =============================================================================

impl PtyProcess {
    /// Resize the PTY to new dimensions.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), PtyError> {
        let new_size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        self.master
            .resize(new_size)
            .map_err(|e| PtyError::Io(format!("PTY resize failed: {e}")))?;
        self.size = new_size;
        Ok(())
    }
}

// =============================================================================
// KILL
// =============================================================================

impl PtyProcess {
    /// Kill the shell and close its input.
    ///
    /// Idempotent. Returns `true` only for the call that actually signalled
    /// the process. A process that already exited is not an error.
    pub fn kill(&mut self) -> bool {
        self.input_tx = None;
        let Some(mut killer) = self.killer.take() else {
            return false;
        };
        if let Err(e) = killer.kill() {
            tracing::debug!(pid = ?self.pid, "PTY kill error (may already be dead): {e}");
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
