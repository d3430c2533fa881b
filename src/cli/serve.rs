//! Serve command - Start MCP server

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use super::utils::open_store;
use crate::mcp::run_mcp_server;

/// Start MCP server for AI integration
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Transport mode (only stdio is supported)
    #[arg(long, default_value = "stdio")]
    pub transport: String,

    /// Create the history directory if it does not exist
    #[arg(long)]
    pub auto_init: bool,
}

pub fn run(args: ServeArgs, dir: Option<PathBuf>) -> Result<()> {
    if args.transport != "stdio" {
        bail!("Unknown transport: {}. Use 'stdio'.", args.transport);
    }

    let store = open_store(dir)?;
    if !store.dir().is_dir() {
        if !args.auto_init {
            bail!(
                "History directory not found at {}. Run 'chatlog init' or use --auto-init.",
                store.dir().display()
            );
        }
        fs::create_dir_all(store.dir())?;
        tracing::info!(dir = %store.dir().display(), "Created history directory");
    }

    eprintln!("🚀 Starting MCP server (transport: stdio)");
    eprintln!("📂 History: {}", store.dir().display());

    // run_mcp_server blocks on stdin
    run_mcp_server(store)
}
