//! History store
//!
//! Facade over one history directory: saveTurn, listRecords and single-record
//! lookup, plus the sources sidecar. Holds no state beyond the directory path
//! and marker texts; the file system is the only integration point between
//! writers and readers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::{StoreError, StoreResult};
use super::parser::parse_record;
use super::record::{ConversationTurn, Markers, StoredRecord};
use super::scanner::{scan, DateRange};
use super::sources::SourcesIndex;
use super::timestamp;
use super::writer::write_turn_at;

/// A directory of stored turns
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
    markers: Markers,
}

impl HistoryStore {
    /// Store with the default marker headings
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            markers: Markers::default(),
        }
    }

    /// Set marker headings
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Persist a turn; returns the new record's filename
    pub fn save_turn(&self, turn: &ConversationTurn) -> StoreResult<String> {
        self.save_turn_at(turn, Utc::now())
    }

    /// Persist a turn stamped with `instant`
    pub fn save_turn_at(
        &self,
        turn: &ConversationTurn,
        instant: DateTime<Utc>,
    ) -> StoreResult<String> {
        let filename = write_turn_at(&self.dir, turn, &self.markers, instant)?;

        // The record is durable at this point; a sidecar failure only loses
        // the references. An unreadable sidecar is left untouched rather than
        // replaced by a one-entry index.
        match SourcesIndex::open(&self.dir) {
            Ok(mut index) => {
                index.insert(filename.clone(), turn.sources.clone());
                if let Err(e) = index.save(&self.dir) {
                    tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to update sources index");
                }
            }
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "Sources index unreadable, not updating it");
            }
        }

        Ok(filename)
    }

    /// Records inside `range`, newest first
    pub fn list_records(&self, range: &DateRange) -> StoreResult<Vec<StoredRecord>> {
        let mut records = scan(&self.dir, range, &self.markers)?;

        let index = SourcesIndex::load(&self.dir);
        for record in &mut records {
            record.sources = index.get(&record.filename).to_vec();
        }

        tracing::debug!(dir = %self.dir.display(), count = records.len(), "Listed records");
        Ok(records)
    }

    /// Read one record by filename
    pub fn get(&self, filename: &str) -> StoreResult<StoredRecord> {
        let instant = timestamp::decode(filename)
            .ok_or_else(|| StoreError::InvalidFilename(filename.to_string()))?;

        let path = self.dir.join(filename);
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(filename.to_string())
            } else {
                StoreError::Read { path, source }
            }
        })?;

        let mut record = parse_record(&content, filename, instant, &self.markers);
        record.sources = SourcesIndex::load(&self.dir).get(filename).to_vec();
        Ok(record)
    }
}

/// Save a question/answer pair into `dir` with the default markers
pub fn save_turn(question: &str, answer: &str, dir: &Path) -> StoreResult<String> {
    HistoryStore::new(dir).save_turn(&ConversationTurn::new(question, answer))
}

/// List the records of `dir` inside `[start, end]`, newest first
pub fn list_records(
    dir: &Path,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> StoreResult<Vec<StoredRecord>> {
    HistoryStore::new(dir).list_records(&DateRange::new(start, end))
}
