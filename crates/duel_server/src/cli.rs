//! Command-line interface for duel_server.

use clap::Parser;
use std::path::PathBuf;

/// Duel Server - two-party tic-tac-toe over TCP
#[derive(Parser, Debug)]
#[command(name = "duel_server")]
#[command(about = "Seats two TCP clients and referees one tic-tac-toe game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides the config file)
    #[arg(short, long)]
    pub port: Option<u16>,
}
