//! Record - conversation turns and their stored form
//!
//! # Key Properties
//! - **filename**: on-disk name, carries the timestamp
//! - **title**: first non-marker level-1 heading, or the filename
//! - **question/answer**: section bodies, newline-joined paragraphs
//! - **timestamp**: decoded from the filename, never from file metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default marker heading for the Question section
pub const DEFAULT_QUESTION_MARKER: &str = "Pergunta";

/// Default marker heading for the Answer section
pub const DEFAULT_ANSWER_MARKER: &str = "Resposta";

/// A question/answer pair to be persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,

    /// Optional display title written as the first heading
    pub title: Option<String>,

    /// Source references used to produce the answer
    pub sources: Vec<String>,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            title: None,
            sources: Vec::new(),
        }
    }

    /// Set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set sources
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }
}

/// A turn reconstructed from disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub filename: String,
    pub title: String,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl std::fmt::Display for StoredRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.title
        )
    }
}

/// Literal heading texts delimiting the two sections of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub question: String,
    pub answer: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION_MARKER.to_string(),
            answer: DEFAULT_ANSWER_MARKER.to_string(),
        }
    }
}

impl Markers {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Does this heading text name the Question section?
    pub fn is_question(&self, heading: &str) -> bool {
        normalize(heading) == self.question.trim()
    }

    /// Does this heading text name the Answer section?
    pub fn is_answer(&self, heading: &str) -> bool {
        normalize(heading) == self.answer.trim()
    }

    pub fn is_marker(&self, heading: &str) -> bool {
        self.is_question(heading) || self.is_answer(heading)
    }
}

/// Older histories spell the Question marker with a trailing colon.
fn normalize(heading: &str) -> &str {
    let trimmed = heading.trim();
    trimmed.strip_suffix(':').map(str::trim_end).unwrap_or(trimmed)
}
