//! Plain-HTTP liveness probe served on the terminal listener.
//!
//! The request line is peeked before the WebSocket handshake, so a probe
//! never reaches tungstenite and a terminal connection never loses bytes.

use std::time::Duration;

use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::Instant;

/// Bytes peeked to recognise a probe's request line.
const PEEK_LEN: usize = 256;

/// How long to wait for a request line that arrives in pieces.
const PEEK_DEADLINE: Duration = Duration::from_millis(500);

/// Pause between peeks while the request line is still incomplete.
const PEEK_RETRY: Duration = Duration::from_millis(5);

/// Whether a request line asks for `GET <path>`.
pub fn is_probe_request(head: &[u8], path: &str) -> bool {
    let prefix = format!("GET {path}");
    head.starts_with(prefix.as_bytes()) && matches!(head.get(prefix.len()), Some(b' ' | b'?'))
}

/// Decide from the bytes received so far, or `None` if they are still a
/// prefix of `GET <path>` and more are needed.
fn probe_decision(head: &[u8], path: &str) -> Option<bool> {
    let prefix = format!("GET {path}");
    if head.len() > prefix.len() {
        Some(is_probe_request(head, path))
    } else if prefix.as_bytes().starts_with(head) {
        None
    } else {
        Some(false)
    }
}

/// Peek at a fresh connection and report whether it is a health probe.
///
/// Peeks again while the bytes so far could still be a probe, so a request
/// line split across segments is recognised. Upgrade requests diverge from
/// the probe path early and are never held back for long.
pub async fn is_probe(stream: &TcpStream, path: &str) -> bool {
    let mut buf = [0u8; PEEK_LEN];
    let deadline = Instant::now() + PEEK_DEADLINE;
    loop {
        let n = match stream.peek(&mut buf).await {
            Ok(0) => return false,
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "Peek failed");
                return false;
            }
        };
        if let Some(decision) = probe_decision(&buf[..n], path) {
            return decision;
        }
        if n == PEEK_LEN || Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(PEEK_RETRY).await;
    }
}

/// JSON body of a probe response.
pub fn probe_body() -> String {
    json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    })
    .to_string()
}

/// Answer a probe and close the connection.
pub async fn respond(mut stream: TcpStream) -> std::io::Result<()> {
    let body = probe_body();
    let response = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Cache-Control: no-store\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_probe_line() {
        assert!(is_probe_request(b"GET /health HTTP/1.1\r\nHost: x\r\n", "/health"));
        assert!(is_probe_request(b"GET /health?full=1 HTTP/1.1\r\n", "/health"));
    }

    #[test]
    fn rejects_other_requests() {
        assert!(!is_probe_request(b"GET /terminal HTTP/1.1\r\n", "/health"));
        assert!(!is_probe_request(b"GET /healthz HTTP/1.1\r\n", "/health"));
        assert!(!is_probe_request(b"POST /health HTTP/1.1\r\n", "/health"));
        assert!(!is_probe_request(b"GET /health", "/health"));
        assert!(!is_probe_request(b"", "/health"));
    }

    #[test]
    fn partial_request_line_waits_for_more() {
        assert_eq!(probe_decision(b"GET /hea", "/health"), None);
        assert_eq!(probe_decision(b"GET /health", "/health"), None);
        assert_eq!(probe_decision(b"G", "/health"), None);
        assert_eq!(probe_decision(b"GET /health ", "/health"), Some(true));
        assert_eq!(probe_decision(b"GET /healthz", "/health"), Some(false));
        assert_eq!(probe_decision(b"GET /term", "/health"), Some(false));
        assert_eq!(probe_decision(b"POST", "/health"), Some(false));
    }

    #[test]
    fn body_reports_ok_with_timestamp() {
        let body: serde_json::Value = serde_json::from_str(&probe_body()).unwrap();
        assert_eq!(body["status"], "ok");
        let ts = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
