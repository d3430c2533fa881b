//! Record writer
//!
//! Renders a turn into the canonical document and persists it under a
//! timestamp-keyed filename. A write never merges with an existing file:
//! two turns in the same microsecond overwrite each other.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::error::{StoreError, StoreResult};
use super::heading::shift_headings;
use super::record::{ConversationTurn, Markers};
use super::timestamp;

/// Render the on-disk document for a turn
///
/// ```text
/// # <title>            (only when the turn has one)
///
/// # <question marker>
///
/// <question, headings shifted>
///
/// # <answer marker>
///
/// <answer, headings shifted>
/// ```
pub fn render_document(turn: &ConversationTurn, markers: &Markers) -> StoreResult<String> {
    let mut doc = String::new();

    if let Some(title) = turn.title.as_deref().and_then(single_line) {
        if markers.is_marker(&title) {
            return Err(StoreError::ReservedTitle(title));
        }
        doc.push_str(&format!("# {}\n\n", title));
    }

    doc.push_str(&format!(
        "# {}\n\n{}\n\n# {}\n\n{}\n",
        markers.question,
        shift_headings(&turn.question),
        markers.answer,
        shift_headings(&turn.answer),
    ));

    Ok(doc)
}

/// Write a turn stamped with the current instant
pub fn write_turn(dir: &Path, turn: &ConversationTurn, markers: &Markers) -> StoreResult<String> {
    write_turn_at(dir, turn, markers, Utc::now())
}

/// Write a turn stamped with `instant`; returns the generated filename
pub fn write_turn_at(
    dir: &Path,
    turn: &ConversationTurn,
    markers: &Markers,
    instant: DateTime<Utc>,
) -> StoreResult<String> {
    let document = render_document(turn, markers)?;
    let filename = timestamp::filename_for(&instant);
    let path = dir.join(&filename);

    fs::write(&path, document).map_err(|source| StoreError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(file = %path.display(), "Recorded turn");
    Ok(filename)
}

/// Collapse a title onto one line; blank titles are dropped
fn single_line(title: &str) -> Option<String> {
    let line = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!line.is_empty()).then_some(line)
}
