//! chatlog CLI - Entry point
//!
//! Usage: chatlog <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatlog::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries command output (and MCP frames); logs go to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let dir = cli.dir;
    match cli.command {
        Commands::Init(args) => chatlog::cli::init::run(args),
        Commands::Save(args) => chatlog::cli::save::run(args, dir),
        Commands::Ls(args) => chatlog::cli::list::run(args, dir),
        Commands::Show(args) => chatlog::cli::show::run(args, dir),
        Commands::Ask(args) => chatlog::cli::ask::run(args, dir).await,
        Commands::Serve(args) => chatlog::cli::serve::run(args, dir),
        Commands::Config(args) => chatlog::cli::config::run(args),
    }
}
