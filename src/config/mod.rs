//! Configuration module
//!
//! Layered TOML config: local `.chatlog/config.toml` (walking up from the
//! current directory), then global `~/.chatlog/config.toml`, then defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::record::{Markers, DEFAULT_ANSWER_MARKER, DEFAULT_QUESTION_MARKER};

/// Name of the per-project config directory
pub const CONFIG_DIR: &str = ".chatlog";

/// Env var overriding the history directory
pub const HISTORY_DIR_ENV: &str = "CHATLOG_HISTORY_DIR";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    /// Directory holding `.chatlog/` this config was loaded from
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History directory (relative paths resolve against the config root)
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_question_marker")]
    pub question_marker: String,

    #[serde(default = "default_answer_marker")]
    pub answer_marker: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: None,
            question_marker: default_question_marker(),
            answer_marker: default_answer_marker(),
        }
    }
}

fn default_question_marker() -> String {
    DEFAULT_QUESTION_MARKER.to_string()
}

fn default_answer_marker() -> String {
    DEFAULT_ANSWER_MARKER.to_string()
}

/// External reasoning service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service URL (e.g., "http://localhost:8000")
    #[serde(default)]
    pub url: Option<String>,

    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,

    /// Working-directory context sent with each question
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_service_timeout(),
            base_dir: None,
        }
    }
}

fn default_service_timeout() -> u64 {
    300
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        // Try local config first, then global
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.root = path
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf);
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .chatlog/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        Self::find_local(|dir| dir.join("config.toml"))
    }

    /// Find local .chatlog/ directory walking up directories
    pub fn find_local_dir() -> Option<PathBuf> {
        Self::find_local(Path::to_path_buf)
    }

    fn find_local(pick: impl Fn(&Path) -> PathBuf) -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let candidate = pick(&current.join(CONFIG_DIR));
            if candidate.exists() {
                return Some(candidate);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Global config directory (~/.chatlog)
    pub fn global_dir() -> Option<PathBuf> {
        directories::UserDirs::new().map(|u| u.home_dir().join(CONFIG_DIR))
    }

    /// Get global config path (~/.chatlog/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|d| d.join("config.toml"))
    }

    /// Marker headings from config
    pub fn markers(&self) -> Markers {
        Markers::new(
            self.history.question_marker.clone(),
            self.history.answer_marker.clone(),
        )
    }

    /// Get history directory with priority:
    /// 1. CHATLOG_HISTORY_DIR env var
    /// 2. history.dir from config (relative to the config root)
    /// 3. Local .chatlog/history (walking up from CWD)
    /// 4. Global ~/.chatlog/history
    pub fn history_dir(&self) -> PathBuf {
        if let Ok(env_path) = std::env::var(HISTORY_DIR_ENV) {
            if !env_path.is_empty() {
                return PathBuf::from(env_path);
            }
        }

        if let Some(dir) = &self.history.dir {
            return match &self.root {
                Some(root) if dir.is_relative() => root.join(dir),
                _ => dir.clone(),
            };
        }

        if let Some(local) = Self::find_local_dir() {
            return local.join("history");
        }

        if let Some(global) = Self::global_dir() {
            return global.join("history");
        }

        PathBuf::from(CONFIG_DIR).join("history")
    }
}
