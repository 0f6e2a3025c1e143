//! The session actor: pumps shell output to the socket and socket input,
//! through the guard, to the shell.

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use shellgate_guard::{needs_inspection, VerdictKind};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use super::decode::Utf8Decoder;
use super::types::{CloseCause, SessionSummary};
use super::Session;

/// How long to keep collecting output after the shell has exited.
const EXIT_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// How long the writer gets to finish the closing handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Shown when a blocked verdict carries no reason of its own.
const DEFAULT_BLOCK_REASON: &str = "Dangerous command blocked for safety.";

/// Render a guard refusal as a red line in the terminal stream.
pub fn warning_line(reason: &str) -> String {
    format!("\r\n\x1b[31m{reason}\x1b[0m\r\n")
}

impl Session {
    /// Drive the session until either side ends, then tear it down.
    pub async fn run<S>(mut self, ws: WebSocketStream<S>) -> SessionSummary
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (sink, mut inbound) = ws.split();
        let (out_tx, out_rx) = mpsc::channel(self.settings.output_queue_frames);
        let writer = tokio::spawn(write_frames(sink, out_rx));
        let mut decoder = Utf8Decoder::default();
        let mut exit_seen = false;

        let cause = loop {
            tokio::select! {
                chunk = self.streams.output.recv() => match chunk {
                    Some(bytes) => self.forward_output(&out_tx, &mut decoder, &bytes),
                    None => break CloseCause::ProcessExited,
                },

                exit = &mut self.streams.exit => {
                    exit_seen = true;
                    self.exit_code = exit.ok().and_then(|e| e.code);
                    self.drain_output(&out_tx, &mut decoder).await;
                    break CloseCause::ProcessExited;
                }

                frame = inbound.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        self.handle_input(&out_tx, text.as_str(), text.as_bytes());
                    }
                    Some(Ok(Message::Binary(data))) => {
                        let text = String::from_utf8_lossy(&data);
                        self.handle_input(&out_tx, &text, &data);
                    }
                    Some(Ok(Message::Close(_))) | None => break CloseCause::ClientClosed,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break CloseCause::SocketError(e.to_string()),
                },
            }
        };

        if !cause.is_socket_side() && !exit_seen {
            // Output hit EOF first; the waiter reports shortly after.
            if let Ok(Ok(exit)) = tokio::time::timeout(EXIT_DRAIN_GRACE, &mut self.streams.exit).await
            {
                self.exit_code = exit.code;
            }
        }

        self.teardown(&cause);

        match &cause {
            CloseCause::SocketError(_) => writer.abort(),
            CloseCause::ClientClosed => {
                // The writer's final `close` flushes the reply to the
                // client's Close frame.
                drop(out_tx);
                finish_writer(writer).await;
            }
            CloseCause::ProcessExited => {
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: "shell exited".into(),
                };
                let _ = tokio::time::timeout(
                    CLOSE_GRACE,
                    out_tx.send(Message::Close(Some(frame))),
                )
                .await;
                drop(out_tx);
                finish_writer(writer).await;
            }
        }

        self.summary(cause)
    }

    /// Queue one chunk of shell output. Never waits on the socket.
    fn forward_output(
        &mut self,
        out_tx: &mpsc::Sender<Message>,
        decoder: &mut Utf8Decoder,
        bytes: &[u8],
    ) {
        let text = decoder.decode(bytes);
        if text.is_empty() {
            return;
        }
        let len = text.len() as u64;
        match out_tx.try_send(Message::Text(text.into())) {
            Ok(()) => self.stats.bytes_out += len,
            Err(TrySendError::Full(_)) => {
                self.stats.dropped_frames += 1;
                if self.stats.dropped_frames == 1 {
                    tracing::warn!(session = %self.id.short(), "Client not keeping up, dropping output");
                }
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Forward whatever output the shell left behind when it exited.
    async fn drain_output(&mut self, out_tx: &mpsc::Sender<Message>, decoder: &mut Utf8Decoder) {
        let deadline = tokio::time::Instant::now() + EXIT_DRAIN_GRACE;
        while let Ok(Some(bytes)) =
            tokio::time::timeout_at(deadline, self.streams.output.recv()).await
        {
            self.forward_output(out_tx, decoder, &bytes);
        }
    }

    /// Guard, then forward, one inbound chunk.
    fn handle_input(&mut self, out_tx: &mpsc::Sender<Message>, text: &str, raw: &[u8]) {
        if needs_inspection(text) {
            let verdict = self.settings.guard.classify(text);
            match verdict.kind() {
                VerdictKind::Blocked => {
                    self.stats.blocked += 1;
                    let reason = verdict.reason.as_deref().unwrap_or(DEFAULT_BLOCK_REASON);
                    tracing::warn!(
                        session = %self.id.short(),
                        command = ?text.trim(),
                        reason,
                        "Blocked dangerous command"
                    );
                    let _ = out_tx.try_send(Message::Text(warning_line(reason).into()));
                    return;
                }
                VerdictKind::NeedsConfirmation => {
                    self.stats.flagged += 1;
                    tracing::info!(
                        session = %self.id.short(),
                        command = ?text.trim(),
                        "Command requires confirmation"
                    );
                }
                VerdictKind::Allowed => {}
            }
        }

        match self.process.write_input(raw) {
            Ok(()) => self.stats.bytes_in += raw.len() as u64,
            Err(e) => tracing::debug!(session = %self.id.short(), error = %e, "Input not delivered"),
        }
    }
}

/// Wait for the writer to finish closing, giving up after [`CLOSE_GRACE`].
async fn finish_writer(mut writer: JoinHandle<()>) {
    if tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        tracing::debug!("Socket writer did not finish closing");
        writer.abort();
    }
}

/// Socket writer task: sends queued frames in order until a Close frame
/// goes out, a send fails, or the queue closes. Always ends with `close`,
/// which also answers a Close frame received from the client.
async fn write_frames<S>(
    mut sink: SplitSink<WebSocketStream<S>, Message>,
    mut rx: mpsc::Receiver<Message>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(msg) = rx.recv().await {
        let closing = matches!(msg, Message::Close(_));
        if let Err(e) = sink.send(msg).await {
            tracing::debug!(error = %e, "Socket write failed");
            break;
        }
        if closing {
            break;
        }
    }
    if let Err(e) = sink.close().await {
        tracing::debug!(error = %e, "Socket close failed");
    }
}
