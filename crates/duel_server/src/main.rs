//! Duel Server
//!
//! Listens for two participants, plays one game between them, then exits.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use duel_server::{Listener, ServerConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,duel_server=debug,duel_tictactoe=info")),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_overrides(cli.host, cli.port);

    let listener = match Listener::bind(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, "Failed to start listener");
            return Err(e.into());
        }
    };
    info!(addr = %listener.local_addr()?, "Waiting for two participants");

    let report = listener.run().await?;
    info!(
        outcome = ?report.outcome,
        moves = report.history.len(),
        "Final board:\n{}",
        report.board.display()
    );
    for fault in &report.faults {
        warn!(role = %fault.role(), error = %fault, "Participant did not finish cleanly");
    }

    Ok(())
}
