//! Configuration CLI for the corkboard message board.

mod cli;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();
    let store = cli::open_store(args.config)?;

    match args.command {
        Commands::Config { command } => cli::run(&store, command),
    }
}
