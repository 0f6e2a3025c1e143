use std::path::PathBuf;

use clap::Parser;

/// Interactive shells over WebSocket for browser terminals.
#[derive(Parser, Debug)]
#[command(name = "shellgate", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Interface to bind (overrides config and $SHELLGATE_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and $PORT).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
