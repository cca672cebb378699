//! `out` - publish a CI build result to a GitHub pull request
//!
//! Reads `{"source": ..., "params": ...}` from stdin and prints
//! `{"version": ..., "metadata": [...]}` to stdout.

mod cli;

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "out")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Publish a CI build result to a GitHub pull request", long_about = None)]
struct Cli {
    /// Destination directory holding the fetched PR and any referenced files
    destination: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    cli::init_tracing(cli.json_logs, level);

    let response = cli::run_out_command(&cli.destination, std::io::stdin().lock()).await?;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
