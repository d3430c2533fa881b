//! `chatlog init` command
//!
//! # Usage
//! ```bash
//! chatlog init                    # .chatlog/ in the current directory
//! chatlog init /path/to/project
//! chatlog init --global           # ~/.chatlog
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::config::{Config, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Initialize global config (~/.chatlog)
    #[arg(long)]
    pub global: bool,

    /// Overwrite an existing config.toml
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let base_path = if args.global {
        directories::UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Cannot determine home directory")?
    } else {
        args.path.unwrap_or_else(|| PathBuf::from("."))
    };

    let (config_path, history_dir) = init_at(&base_path, args.force)?;

    println!("✅ Initialized chatlog in {}", base_path.display());
    println!("   Config:  {}", config_path.display());
    println!("   History: {}", history_dir.display());
    Ok(())
}

/// Create `<base>/.chatlog/{config.toml,history/}`
pub fn init_at(base: &Path, force: bool) -> Result<(PathBuf, PathBuf)> {
    let root = base.join(CONFIG_DIR);
    let config_path = root.join("config.toml");

    if config_path.exists() && !force {
        bail!(
            "{} is already initialized. Use --force to reinitialize.",
            base.display()
        );
    }

    let history_dir = root.join("history");
    fs::create_dir_all(&history_dir)
        .with_context(|| format!("Failed to create {}", history_dir.display()))?;

    Config::default().save_to(&config_path)?;
    tracing::info!(path = %config_path.display(), "Wrote default config");

    Ok((config_path, history_dir))
}
