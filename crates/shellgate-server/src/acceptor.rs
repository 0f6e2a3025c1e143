//! TCP accept loop: health probes, WebSocket upgrades, one session each.

use std::net::SocketAddr;
use std::sync::Arc;

use shellgate_common::GateError;
use shellgate_config::ServerConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::health;
use crate::session::{self, SessionSettings};

/// Listens for terminal clients and hands each one its own session.
pub struct Acceptor {
    listener: TcpListener,
    terminal_path: Arc<str>,
    health_path: Arc<str>,
    settings: Arc<SessionSettings>,
}

impl Acceptor {
    /// Bind the listener described by `config`.
    pub async fn bind(
        config: &ServerConfig,
        settings: Arc<SessionSettings>,
    ) -> Result<Self, GateError> {
        let addr = config
            .bind_addr()
            .map_err(|e| GateError::Other(format!("invalid bind address '{}': {e}", config.host)))?;
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            terminal_path: config.path.as_str().into(),
            health_path: config.health_path.as_str().into(),
            settings,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GateError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever. A failed accept is logged and skipped.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let terminal_path = self.terminal_path.clone();
                    let health_path = self.health_path.clone();
                    let settings = self.settings.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, peer, &terminal_path, &health_path, settings)
                                .await
                        {
                            tracing::warn!(peer = %peer, error = %e, "Connection failed");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "TCP accept error");
                }
            }
        }
    }
}

/// Serve one accepted TCP connection to completion.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    terminal_path: &str,
    health_path: &str,
    settings: Arc<SessionSettings>,
) -> Result<(), GateError> {
    if health::is_probe(&stream, health_path).await {
        tracing::debug!(peer = %peer, "Health probe");
        health::respond(stream).await?;
        return Ok(());
    }

    let check_path = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        if req.uri().path() == terminal_path {
            Ok(resp)
        } else {
            tracing::debug!(peer = %peer, path = req.uri().path(), "Upgrade on unknown path");
            let mut err = ErrorResponse::new(Some("not found".to_string()));
            *err.status_mut() = StatusCode::NOT_FOUND;
            Err(err)
        }
    };
    let ws = accept_hdr_async(stream, check_path)
        .await
        .map_err(|e| GateError::Transport(format!("handshake failed: {e}")))?;

    tracing::info!(peer = %peer, "Terminal connection established");

    if let Some(summary) = session::serve(ws, settings).await {
        tracing::info!(
            peer = %peer,
            session = %summary.id.short(),
            cause = %summary.cause,
            uptime_ms = summary.uptime.as_millis() as u64,
            bytes_in = summary.stats.bytes_in,
            bytes_out = summary.stats.bytes_out,
            blocked = summary.stats.blocked,
            flagged = summary.stats.flagged,
            dropped_frames = summary.stats.dropped_frames,
            exit_code = ?summary.exit_code,
            "Terminal connection closed"
        );
    }
    Ok(())
}
