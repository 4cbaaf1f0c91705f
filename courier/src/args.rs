use std::path::PathBuf;

use clap::Parser;

/// Courier delivery-partner API
#[derive(Debug, Parser)]
#[command(name = "courier", about = "Delivery-partner API server")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "courier.toml", env = "COURIER_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "COURIER_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Include diagnostics (exception type, file, line, trace) in error responses
    #[arg(long)]
    pub debug: bool,
}
