//! Source references sidecar
//!
//! `font-refs.json` in the history directory maps record filenames to the
//! references the reasoning service cited. The name never matches the record
//! pattern, so scans skip it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Sidecar filename
pub const SOURCES_FILE: &str = "font-refs.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcesIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl SourcesIndex {
    /// Read the sidecar. Missing is empty; unreadable or corrupt is an error.
    pub fn open(dir: &Path) -> io::Result<Self> {
        let content = match fs::read_to_string(dir.join(SOURCES_FILE)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        let entries = serde_json::from_str(&content)?;
        Ok(Self { entries })
    }

    /// Read the sidecar for display; any failure is logged and read as empty
    pub fn load(dir: &Path) -> Self {
        Self::open(dir).unwrap_or_else(|e| {
            tracing::warn!(dir = %dir.display(), error = %e, "Ignoring unreadable sources index");
            Self::default()
        })
    }

    /// Persist the sidecar through a temp file and rename, so readers never
    /// see a partial index
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = dir.join(format!(".{}.tmp", SOURCES_FILE));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, dir.join(SOURCES_FILE))
    }

    pub fn get(&self, filename: &str) -> &[String] {
        self.entries.get(filename).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, filename: impl Into<String>, sources: Vec<String>) {
        self.entries.insert(filename.into(), sources);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
