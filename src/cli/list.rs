//! `chatlog ls` command
//!
//! # Usage
//! ```bash
//! chatlog ls                                   # everything, newest first
//! chatlog ls --from 2024-01-01 --to 2024-01-31 # inclusive, whole UTC days
//! chatlog ls --from 2024-01-15T14:00:00Z -n 5
//! chatlog ls --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::utils::{open_store, truncate_chars};
use crate::core::{DateRange, StoredRecord};

const TITLE_WIDTH: usize = 60;

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Earliest instant to include (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest instant to include (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Show at most this many turns
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Recorded (UTC)")]
    recorded: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "File")]
    file: String,
}

impl From<&StoredRecord> for Row {
    fn from(record: &StoredRecord) -> Self {
        Self {
            recorded: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            title: truncate_chars(&record.title, TITLE_WIDTH),
            file: record.filename.clone(),
        }
    }
}

pub fn run(args: LsArgs, dir: Option<PathBuf>) -> Result<()> {
    let range = DateRange::parse(args.from.as_deref(), args.to.as_deref())?;
    let store = open_store(dir)?;

    let mut records = store.list_records(&range)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("📂 No turns recorded in {}", store.dir().display());
        return Ok(());
    }

    println!("{}", render_table(&records));
    Ok(())
}

fn render_table(records: &[StoredRecord]) -> String {
    let rows: Vec<Row> = records.iter().map(Row::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_render_table_has_rows() {
        let timestamp: DateTime<Utc> = "2024-01-15T14:30:22.123456Z".parse().unwrap();
        let record = StoredRecord {
            filename: "20240115_143022_123456_message.md".to_string(),
            title: "About X".to_string(),
            question: "What is X?".to_string(),
            answer: "X is Y.".to_string(),
            timestamp,
            sources: vec![],
        };

        let table = render_table(&[record]);
        assert!(table.contains("Recorded (UTC)"));
        assert!(table.contains("2024-01-15 14:30:22"));
        assert!(table.contains("About X"));
        assert!(table.contains("20240115_143022_123456_message.md"));
    }
}
