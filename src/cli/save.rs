//! `chatlog save` command
//!
//! # Usage
//! ```bash
//! chatlog save "What is X?" "X is Y."
//! chatlog save "What is X?" --answer-file answer.md
//! chatlog save --question-file q.md "X is Y."
//! chatlog save "What is X?" - < answer.md        # answer from stdin
//! chatlog save "Q" "A" --title "About X" --source doc.pdf
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use super::utils::open_store;
use crate::core::ConversationTurn;

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Question then answer text, skipping whichever comes from a file
    /// ("-" reads stdin)
    #[arg(value_names = ["QUESTION", "ANSWER"], num_args = 0..=2)]
    pub texts: Vec<String>,

    /// Read the question from a file
    #[arg(long)]
    pub question_file: Option<PathBuf>,

    /// Read the answer from a file
    #[arg(long)]
    pub answer_file: Option<PathBuf>,

    /// Title heading for the record
    #[arg(short, long)]
    pub title: Option<String>,

    /// Source document the answer drew from (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,
}

/// Where each side of the turn comes from
#[derive(Debug, PartialEq, Eq)]
enum Source {
    Inline(String),
    Stdin,
    File(PathBuf),
}

pub fn run(args: SaveArgs, dir: Option<PathBuf>) -> Result<()> {
    let (question, answer) = assign_sources(args.texts, args.question_file, args.answer_file)?;
    let question = read_source("question", question)?;
    let answer = read_source("answer", answer)?;

    let mut turn = ConversationTurn::new(question, answer).with_sources(args.sources);
    if let Some(title) = args.title {
        turn = turn.with_title(title);
    }

    let store = open_store(dir)?;
    let filename = store.save_turn(&turn)?;
    println!("✅ Turn saved: {}", store.dir().join(filename).display());
    Ok(())
}

/// Positional texts fill the question first, then the answer, skipping a
/// side already given by file
fn assign_sources(
    texts: Vec<String>,
    question_file: Option<PathBuf>,
    answer_file: Option<PathBuf>,
) -> Result<(Source, Source)> {
    let mut texts = texts.into_iter().map(|t| {
        if t == "-" {
            Source::Stdin
        } else {
            Source::Inline(t)
        }
    });

    let question = match question_file {
        Some(path) => Source::File(path),
        None => texts.next().context("Missing question")?,
    };
    let answer = match answer_file {
        Some(path) => Source::File(path),
        None => texts.next().context("Missing answer")?,
    };

    if texts.next().is_some() {
        bail!("Too many texts: both sides are already given");
    }
    if question == Source::Stdin && answer == Source::Stdin {
        bail!("Only one of question and answer can read stdin");
    }
    Ok((question, answer))
}

fn read_source(what: &str, source: Source) -> Result<String> {
    match source {
        Source::Inline(text) => Ok(text),
        Source::Stdin => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Source::File(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {} from {}", what, path.display())),
    }
}
