//! PTY spawn logic: open a pair, start the shell, start the I/O threads.

use std::io::{Read, Write};
use std::sync::mpsc as std_mpsc;
use std::thread;

use portable_pty::{native_pty_system, Child, CommandBuilder};
use shellgate_common::PtyError;
use tokio::sync::{mpsc, oneshot};

use crate::types::{ProcessExit, PtyOptions, PtyProcess, PtyStreams, PTY_READ_CHUNK};

/// Build the command for a shell. The environment is inherited as-is.
fn build_shell_command(opts: &PtyOptions) -> CommandBuilder {
    let mut cmd = CommandBuilder::new(&opts.shell);
    if let Some(dir) = &opts.cwd {
        cmd.cwd(dir);
    }
    cmd
}

/// Spawn a shell behind a new PTY.
///
/// On success the returned handle owns the process, and the streams carry
/// its output and its exit. Any failure before the child runs is reported
/// as a [`PtyError`] and leaves nothing behind.
pub fn spawn_pty(opts: &PtyOptions) -> Result<(PtyProcess, PtyStreams), PtyError> {
    let size = opts.size();
    let pair = native_pty_system()
        .openpty(size)
        .map_err(|e| PtyError::Open(e.to_string()))?;

    let child = pair
        .slave
        .spawn_command(build_shell_command(opts))
        .map_err(|e| PtyError::Spawn {
            shell: opts.shell.clone(),
            reason: e.to_string(),
        })?;

    // Only the child keeps the slave open, so reads hit EOF once it is gone.
    drop(pair.slave);

    let pid = child.process_id();
    let mut killer = child.clone_killer();

    let io = pair
        .master
        .take_writer()
        .map_err(|e| PtyError::Io(format!("failed to take PTY writer: {e}")))
        .and_then(|writer| {
            let reader = pair
                .master
                .try_clone_reader()
                .map_err(|e| PtyError::Io(format!("failed to clone PTY reader: {e}")))?;
            Ok((writer, reader))
        });
    let (writer, reader) = match io {
        Ok(handles) => handles,
        Err(e) => {
            let _ = killer.kill();
            return Err(e);
        }
    };

    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let (input_tx, input_rx) = std_mpsc::channel();
    let (exit_tx, exit_rx) = oneshot::channel();

    let threads = start_reader(reader, output_tx)
        .and_then(|_| start_writer(writer, input_rx))
        .and_then(|_| start_waiter(child, exit_tx));
    if let Err(e) = threads {
        let _ = killer.kill();
        return Err(PtyError::Io(format!("failed to start PTY thread: {e}")));
    }

    tracing::debug!(shell = %opts.shell, pid = ?pid, "PTY spawned");

    let process = PtyProcess {
        input_tx: Some(input_tx),
        killer: Some(killer),
        master: pair.master,
        pid,
        size,
        shell: opts.shell.clone(),
        cwd: opts.cwd.clone(),
    };
    let streams = PtyStreams {
        output: output_rx,
        exit: exit_rx,
    };
    Ok((process, streams))
}

fn start_reader(
    mut reader: Box<dyn Read + Send>,
    tx: mpsc::UnboundedSender<Vec<u8>>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("pty-reader".to_string())
        .spawn(move || {
            let mut buf = [0u8; PTY_READ_CHUNK];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break, // EOF: shell exited
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => {
                        tracing::debug!("PTY reader stopped: {e}");
                        break;
                    }
                }
            }
        })
        .map(|_| ())
}

fn start_writer(
    mut writer: Box<dyn Write + Send>,
    rx: std_mpsc::Receiver<Vec<u8>>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("pty-writer".to_string())
        .spawn(move || {
            for chunk in rx {
                if let Err(e) = writer.write_all(&chunk).and_then(|_| writer.flush()) {
                    tracing::debug!("PTY writer stopped: {e}");
                    break;
                }
            }
        })
        .map(|_| ())
}

fn start_waiter(
    mut child: Box<dyn Child + Send + Sync>,
    tx: oneshot::Sender<ProcessExit>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("pty-waiter".to_string())
        .spawn(move || {
            let code = match child.wait() {
                Ok(status) => Some(status.exit_code()),
                Err(e) => {
                    tracing::debug!("PTY wait error: {e}");
                    None
                }
            };
            let _ = tx.send(ProcessExit { code });
        })
        .map(|_| ())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sh_options() -> PtyOptions {
        PtyOptions {
            shell: "/bin/sh".into(),
            cwd: None,
            cols: 80,
            rows: 24,
        }
    }

    #[tokio::test]
    async fn spawn_pty_creates_handle() {
        let (process, _streams) = spawn_pty(&sh_options()).expect("spawn should succeed");
        assert_eq!(process.size(), (80, 24));
        assert_eq!(process.shell(), "/bin/sh");
        assert!(process.pid().is_some());
        assert!(!process.is_killed());
    }

    #[tokio::test]
    async fn spawn_missing_shell_fails() {
        let opts = PtyOptions {
            shell: "/nonexistent/shellgate-test-shell".into(),
            ..sh_options()
        };
        let err = spawn_pty(&opts).unwrap_err();
        assert!(matches!(err, PtyError::Spawn { .. }), "got {err:?}");
        assert!(err.to_string().contains("shellgate-test-shell"));
    }

    #[tokio::test]
    async fn exit_is_reported_when_shell_exits() {
        let (process, streams) = spawn_pty(&sh_options()).unwrap();
        process.write_input(b"exit 3\n").unwrap();
        let exit = tokio::time::timeout(Duration::from_secs(10), streams.exit)
            .await
            .expect("shell should exit")
            .expect("waiter should report");
        assert_eq!(exit.code, Some(3));
    }

    #[tokio::test]
    async fn working_directory_is_applied() {
        let dir = std::env::temp_dir().canonicalize().unwrap();
        let opts = PtyOptions {
            cwd: Some(dir.clone()),
            ..sh_options()
        };
        let (process, mut streams) = spawn_pty(&opts).unwrap();
        process.write_input(b"pwd; echo PWD_DONE\n").unwrap();

        let mut seen = String::new();
        let _ = tokio::time::timeout(Duration::from_secs(10), async {
            while let Some(chunk) = streams.output.recv().await {
                seen.push_str(&String::from_utf8_lossy(&chunk));
                if seen.matches("PWD_DONE").count() >= 2 {
                    break;
                }
            }
        })
        .await;
        assert!(seen.contains(dir.to_str().unwrap()), "output: {seen}");
    }
}
