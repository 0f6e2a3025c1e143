//! PTY process layer: spawns the host shell behind a pseudo-terminal.
//!
//! Uses `portable-pty` for cross-platform PTY spawning. Every process gets
//! a reader thread (output → async channel), a writer thread (input queue →
//! PTY) and a waiter thread (reaps the child and reports its exit), so the
//! async side never blocks on the PTY.

mod io;
mod shell;
mod spawn;
mod types;

pub use shell::{default_working_dir, shell_for, HostPlatform};
pub use spawn::spawn_pty;
pub use types::{
    ProcessExit, PtyOptions, PtyProcess, PtyStreams, DEFAULT_COLS, DEFAULT_ROWS, PTY_READ_CHUNK,
};
