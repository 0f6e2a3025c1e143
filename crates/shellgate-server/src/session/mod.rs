//! Terminal session: one shell process bridged to one WebSocket.
//!
//! A session is created for a freshly accepted connection, spawns its own
//! PTY process, and owns both until it closes. Nothing is shared between
//! sessions except the read-only [`SessionSettings`].
//!
//! Lifecycle: `Spawning → Active → Closed`. A spawn failure goes straight to
//! `Closed` and the socket is closed with an error frame. Once active,
//! whichever side ends first (client close, socket error, shell exit) tears
//! down the other.

mod bridge;
mod decode;
mod types;


use std::sync::Arc;
use std::time::Instant;

use shellgate_common::{PtyError, SessionId};
use shellgate_pty::{spawn_pty, PtyProcess, PtyStreams};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::WebSocketStream;

pub use types::{CloseCause, SessionSettings, SessionState, SessionStats, SessionSummary};

/// Close reason sent when the shell cannot be started.
pub const SPAWN_FAILED_REASON: &str = "failed to start shell";

/// One live shell plus the bookkeeping needed to tear it down once.
pub struct Session {
    id: SessionId,
    process: PtyProcess,
    streams: PtyStreams,
    state: SessionState,
    created_at: Instant,
    settings: Arc<SessionSettings>,
    stats: SessionStats,
    exit_code: Option<u32>,
}

impl Session {
    /// Spawn the shell for a new session. Blocking; call off the runtime.
    pub fn spawn(id: SessionId, settings: Arc<SessionSettings>) -> Result<Self, PtyError> {
        tracing::debug!(session = %id.short(), shell = %settings.pty.shell, "Spawning shell");
        let (process, streams) = spawn_pty(&settings.pty)?;
        tracing::debug!(
            session = %id.short(),
            pid = ?process.pid(),
            cwd = ?process.cwd(),
            "Session active"
        );
        Ok(Self {
            id,
            process,
            streams,
            state: SessionState::Active,
            created_at: Instant::now(),
            settings,
            stats: SessionStats::default(),
            exit_code: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.pid()
    }

    /// Move to `Closed` and kill the shell.
    ///
    /// Idempotent: only the first call does anything and returns `true`.
    pub fn teardown(&mut self, cause: &CloseCause) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        let signalled = self.process.kill();
        tracing::debug!(
            session = %self.id.short(),
            cause = %cause,
            signalled,
            "Session torn down"
        );
        true
    }

    fn summary(&self, cause: CloseCause) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            cause,
            uptime: self.created_at.elapsed(),
            stats: self.stats,
            exit_code: self.exit_code,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("process", &self.process)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Run a whole session over an upgraded connection.
///
/// Returns `None` when the shell could not be started; the socket has then
/// already been closed with an error frame.
pub async fn serve<S>(
    mut ws: WebSocketStream<S>,
    settings: Arc<SessionSettings>,
) -> Option<SessionSummary>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let id = SessionId::new();
    tracing::debug!(session = %id.short(), state = ?SessionState::Spawning, "Session opened");
    let spawn_id = id.clone();
    let spawned = tokio::task::spawn_blocking(move || Session::spawn(spawn_id, settings)).await;

    let session = match spawned {
        Ok(Ok(session)) => session,
        Ok(Err(e)) => {
            tracing::warn!(session = %id.short(), error = %e, "Shell spawn failed");
            reject(&mut ws).await;
            return None;
        }
        Err(e) => {
            tracing::warn!(session = %id.short(), error = %e, "Shell spawn task failed");
            reject(&mut ws).await;
            return None;
        }
    };

    Some(session.run(ws).await)
}

/// Close a socket whose session never became active.
async fn reject<S>(ws: &mut WebSocketStream<S>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let frame = CloseFrame {
        code: CloseCode::Error,
        reason: SPAWN_FAILED_REASON.into(),
    };
    if let Err(e) = ws.close(Some(frame)).await {
        tracing::debug!(error = %e, "Close after spawn failure failed");
    }
}
