use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Listener settings: where the bridge accepts connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port. `0` asks the OS for an ephemeral port.
    pub port: u16,
    /// Path of the WebSocket terminal endpoint.
    pub path: String,
    /// Path answering the plain-HTTP liveness probe.
    pub health_path: String,
}

impl ServerConfig {
    /// Parse `host:port` into a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port).parse()
        } else {
            format!("{}:{}", self.host, self.port).parse()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            path: "/terminal".into(),
            health_path: "/health".into(),
        }
    }
}
