//! CLI utility functions
//!
//! Store resolution shared across commands.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::core::HistoryStore;

/// Open the history store: `--dir` wins, then the configured directory
pub fn open_store(dir_override: Option<PathBuf>) -> Result<HistoryStore> {
    let config = Config::load()?;
    Ok(store_from(&config, dir_override))
}

pub fn store_from(config: &Config, dir_override: Option<PathBuf>) -> HistoryStore {
    let dir = dir_override.unwrap_or_else(|| config.history_dir());
    tracing::debug!(dir = %dir.display(), "Using history directory");
    HistoryStore::new(dir).with_markers(config.markers())
}

/// First `max_words` words of `text`, single-spaced
pub fn leading_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to at most `max` chars, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
