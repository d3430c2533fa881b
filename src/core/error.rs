//! Store errors
//!
//! Directory-level and write-level failures surface through [`StoreError`].
//! Per-file problems during a scan are logged and skipped instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("History directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write record {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read record {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Not a record filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid date or instant: {0} (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Title collides with a section marker: {0}")]
    ReservedTitle(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
