//! Directory scanner
//!
//! Lists a history directory, keeps record filenames inside an optional
//! inclusive date range, parses each file and orders the result newest
//! first. Every call re-reads the directory; nothing is cached.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::error::{StoreError, StoreResult};
use super::parser::parse_record;
use super::record::{Markers, StoredRecord};
use super::timestamp::{self, RECORD_EXTENSION};

/// Inclusive instant range; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Unbounded range
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *instant >= start)
            && self.end.map_or(true, |end| *instant <= end)
    }

    /// True when no instant can satisfy both bounds
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    /// Build a range from user-supplied bounds (see [`parse_bound`])
    pub fn parse(start: Option<&str>, end: Option<&str>) -> StoreResult<Self> {
        Ok(Self {
            start: start.map(|s| parse_bound(s, Bound::Start)).transpose()?,
            end: end.map(|s| parse_bound(s, Bound::End)).transpose()?,
        })
    }
}

/// Which side of a range a bound sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse a range bound
///
/// Accepts RFC 3339 (`2024-01-15T14:30:22Z`, any offset), a naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC, or a bare `YYYY-MM-DD` date. A
/// date covers its whole UTC day: the first microsecond as a start bound,
/// the last as an end bound.
pub fn parse_bound(s: &str, bound: Bound) -> StoreResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
                .ok_or_else(|| StoreError::InvalidDate(s.to_string()))?,
        };
        return Ok(Utc.from_utc_datetime(&date.and_time(time)));
    }

    Err(StoreError::InvalidDate(s.to_string()))
}

/// Scan `dir` and return matching records, newest first
///
/// # Errors
/// Only when the directory itself cannot be listed. Unreadable files are
/// logged and skipped.
pub fn scan(dir: &Path, range: &DateRange, markers: &Markers) -> StoreResult<Vec<StoredRecord>> {
    let entries = fs::read_dir(dir).map_err(|source| StoreError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    let suffix = format!(".{}", RECORD_EXTENSION);
    let mut records = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !filename.ends_with(&suffix) {
            continue;
        }

        let Some(instant) = timestamp::decode(&filename) else {
            tracing::debug!(file = %filename, "Not a record filename, skipping");
            continue;
        };

        if !range.contains(&instant) {
            tracing::debug!(file = %filename, "Outside range");
            continue;
        }

        let path = entry.path();
        match fs::read_to_string(&path) {
            Ok(content) => records.push(parse_record(&content, &filename, instant, markers)),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable record");
            }
        }
    }

    sort_by_recency(&mut records);
    Ok(records)
}

/// Newest first; equal timestamps keep their input order
pub fn sort_by_recency(records: &mut [StoredRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
