//! shellgate: interactive shells over WebSocket.
//!
//! Every WebSocket accepted on the terminal path gets its own shell in a
//! pseudo-terminal. Shell output is streamed to the client as text frames;
//! client input goes through the command guard before reaching the shell.

mod acceptor;
mod cli;
mod health;
mod session;

use std::sync::Arc;

use shellgate_config::GateConfig;
use tracing_subscriber::EnvFilter;

use crate::acceptor::Acceptor;
use crate::session::SessionSettings;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let config = load_config(&args);
    init_logging(&args, &config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "shellgate failed");
        std::process::exit(1);
    }
}

/// Load config under a temporary subscriber so loader warnings are visible
/// before the real one is installed. Falls back to defaults on error.
fn load_config(args: &cli::Args) -> GateConfig {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("shellgate=warn"))
        .finish();

    let mut config = tracing::subscriber::with_default(bootstrap, || {
        let loaded = match &args.config {
            Some(path) => shellgate_config::load_config_from(path),
            None => shellgate_config::load_config(),
        };
        loaded.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Config load failed, using defaults");
            let mut config = GateConfig::default();
            shellgate_config::apply_process_env(&mut config);
            config
        })
    });

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config
}

/// Filter precedence: `--log-level`, then `RUST_LOG`, then the config file.
fn init_logging(args: &cli::Args, config: &GateConfig) {
    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(format!("shellgate={level}")),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.logging.level.directive())),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: GateConfig) -> shellgate_common::Result<()> {
    tracing::debug!(config = %shellgate_config::config_to_json(&config), "Effective config");
    let settings = Arc::new(SessionSettings::from_config(&config));
    let acceptor = Acceptor::bind(&config.server, settings.clone()).await?;

    tracing::info!(
        addr = %acceptor.local_addr()?,
        path = %config.server.path,
        health = %config.server.health_path,
        shell = %settings.pty.shell,
        "shellgate listening"
    );

    tokio::select! {
        _ = acceptor.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown requested");
        }
    }
    Ok(())
}
