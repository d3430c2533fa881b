//! `chatlog show` command
//!
//! # Usage
//! ```bash
//! chatlog show 20240115_143022_123456_message.md
//! chatlog show 20240115_143022_123456_message.md --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::open_store;
use crate::core::{Markers, StoredRecord};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record filename (as printed by `chatlog ls`)
    pub filename: String,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs, dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(dir)?;

    // accept a path as well as a bare filename
    let filename = PathBuf::from(&args.filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(args.filename);

    let record = store.get(&filename)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record, store.markers());
    }
    Ok(())
}

fn print_record(record: &StoredRecord, markers: &Markers) {
    println!("{}", record.title.bold());
    println!(
        "{} {}",
        record.timestamp.to_rfc3339().dimmed(),
        record.filename.dimmed()
    );
    println!();
    println!("{}", markers.question.cyan().bold());
    println!("{}", record.question);
    println!();
    println!("{}", markers.answer.cyan().bold());
    println!("{}", record.answer);

    if !record.sources.is_empty() {
        println!();
        println!("{}", "Sources".cyan().bold());
        for source in &record.sources {
            println!("  - {}", source);
        }
    }
}
