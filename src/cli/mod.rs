//! CLI module - Command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::HISTORY_DIR_ENV;

pub mod ask;
pub mod config;
pub mod init;
pub mod list;
pub mod save;
pub mod serve;
pub mod show;
pub mod utils;

/// chatlog - question/answer history as markdown files
///
/// Every turn is one timestamped file; the directory is the database.
#[derive(Parser, Debug)]
#[command(name = "chatlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// History directory (overrides config)
    #[arg(short, long, global = true, env = HISTORY_DIR_ENV)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a .chatlog directory
    Init(init::InitArgs),

    /// Record a question/answer turn
    Save(save::SaveArgs),

    /// List recorded turns, newest first
    Ls(list::LsArgs),

    /// Show one recorded turn
    Show(show::ShowArgs),

    /// Ask the reasoning service and record the turn
    Ask(ask::AskArgs),

    /// Start MCP server over stdio
    Serve(serve::ServeArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}
