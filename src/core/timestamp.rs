//! Timestamp codec
//!
//! Record filenames carry their own instant:
//! `YYYYMMDD_HHMMSS_ffffff_message.md`, always UTC. Keys sort
//! lexicographically in chronological order.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Record-type suffix appended to every key
pub const RECORD_SUFFIX: &str = "_message";

/// Extension of record files
pub const RECORD_EXTENSION: &str = "md";

static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})_(\d{2})(\d{2})(\d{2})_(\d{6})_message\.md$")
        .expect("valid record filename regex")
});

/// Encode an instant as a sortable key (without extension)
pub fn encode(instant: &DateTime<Utc>) -> String {
    format!(
        "{}{}",
        instant.format("%Y%m%d_%H%M%S_%6f"),
        RECORD_SUFFIX
    )
}

/// Full record filename for an instant
pub fn filename_for(instant: &DateTime<Utc>) -> String {
    format!("{}.{}", encode(instant), RECORD_EXTENSION)
}

/// Decode a record filename back to its instant
///
/// Returns `None` for anything that is not a record filename, including
/// names with impossible dates such as `20241340_...`.
pub fn decode(filename: &str) -> Option<DateTime<Utc>> {
    let caps = FILENAME_RE.captures(filename)?;
    let num = |i: usize| caps[i].parse::<u32>().ok();

    let year = caps[1].parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;
    let time = NaiveTime::from_hms_micro_opt(num(4)?, num(5)?, num(6)?, num(7)?)?;

    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Drop precision below one microsecond, the resolution of a key
pub fn truncate_to_micros(instant: DateTime<Utc>) -> DateTime<Utc> {
    let micros = instant.nanosecond() / 1_000;
    instant.with_nanosecond(micros * 1_000).unwrap_or(instant)
}
