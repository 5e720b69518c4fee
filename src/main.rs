use std::io::{self, BufRead};
use std::thread;

use clap::Parser;
use dotenv::dotenv;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pktboard::client::HttpSnapshotSource;
use pktboard::config::{Cli, Command, WatchConfig};
use pktboard::renderer::{Control, Renderer, TerminalSink};
use pktboard::server;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing();

    match Cli::parse().command {
        Command::Serve(config) => server::run(config).await?,
        Command::Watch(config) => watch(config).await?,
    }
    Ok(())
}

fn init_tracing() {
    // stderr keeps the terminal board on stdout readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

async fn watch(config: WatchConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = HttpSnapshotSource::new(&config.url, config.timeout())?;
    info!(url = source.url(), interval_ms = config.interval_ms, "watching snapshot");

    let (tx, rx) = mpsc::channel(16);

    let ctrlc_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.blocking_send(Control::Quit);
    })?;

    if !config.no_input {
        spawn_stdin_controls(tx.clone());
    }

    // `tx` stays alive here so stdin EOF does not end the loop; only Quit does.
    Renderer::new(source, TerminalSink::stdout())
        .with_fetch_timeout(config.timeout())
        .run(config.interval(), rx)
        .await;
    drop(tx);
    Ok(())
}

fn spawn_stdin_controls(tx: mpsc::Sender<Control>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.parse::<Control>() {
                Ok(control) => {
                    if tx.blocking_send(control).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
    });
}
