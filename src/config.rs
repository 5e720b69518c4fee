use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::renderer::{DEFAULT_FETCH_TIMEOUT, DEFAULT_PERIOD};

/// Live packet board. Values fall back to `PKTBOARD_*` variables, which may
/// also come from a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "pktboard", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the snapshot file at GET /packets and the dashboard at GET /
    Serve(ServeConfig),
    /// Poll a snapshot endpoint and render the board in the terminal
    Watch(WatchConfig),
}

#[derive(Debug, Clone, Args)]
pub struct ServeConfig {
    #[arg(long, env = "PKTBOARD_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// JSON array written by the capture process
    #[arg(long, env = "PKTBOARD_SNAPSHOT", default_value = "packets.json")]
    pub snapshot: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct WatchConfig {
    #[arg(long, env = "PKTBOARD_URL", default_value = "http://127.0.0.1:8080/packets")]
    pub url: String,

    #[arg(
        long,
        env = "PKTBOARD_INTERVAL_MS",
        default_value_t = DEFAULT_PERIOD.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    #[arg(
        long,
        env = "PKTBOARD_TIMEOUT_MS",
        default_value_t = DEFAULT_FETCH_TIMEOUT.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,

    /// Do not read pause/resume commands from stdin
    #[arg(long)]
    pub no_input: bool,
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
