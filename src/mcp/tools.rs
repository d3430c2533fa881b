//! MCP tool argument structs
//!
//! Simple structs for deserializing tool arguments.

use serde::{Deserialize, Serialize};

/// List stored turns, newest first
#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryListTool {
    /// Inclusive lower bound (RFC 3339 or YYYY-MM-DD)
    #[serde(default)]
    pub start: Option<String>,
    /// Inclusive upper bound (RFC 3339 or YYYY-MM-DD)
    #[serde(default)]
    pub end: Option<String>,
    /// Maximum number of turns (default: 20)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Get one stored turn
#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryGetTool {
    /// Record filename (YYYYMMDD_HHMMSS_ffffff_message.md)
    pub filename: String,
}

/// Record a question/answer turn
#[derive(Debug, Deserialize, Serialize)]
pub struct HistorySaveTool {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}
