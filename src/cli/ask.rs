//! `chatlog ask` command
//!
//! Sends a question to the reasoning service, prints the answer and records
//! the turn.
//!
//! # Usage
//! ```bash
//! chatlog ask -q "What does the contract say about penalties?"
//! chatlog ask --context ./contracts         # interactive session
//! chatlog ask -q "..." --json --no-save
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Input;
use serde::Serialize;

use super::utils::{leading_words, open_store};
use crate::config::Config;
use crate::core::{ConversationTurn, HistoryStore, Markers};
use crate::service::{Answer, Answerer, ServiceClient};

/// Words of the question used as title when the service gives none
const TITLE_WORDS: usize = 9;

const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to ask (omit for an interactive session)
    #[arg(short, long)]
    pub question: Option<String>,

    /// Working directory the service answers against
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// Service URL (overrides service.url)
    #[arg(long)]
    pub service_url: Option<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not record the turn
    #[arg(long)]
    pub no_save: bool,
}

/// One answered question, and where it was recorded
#[derive(Debug, Serialize)]
pub struct AskOutcome {
    pub question: String,
    pub answer: Answer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

pub async fn run(args: AskArgs, dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let mut service = config.service.clone();
    if let Some(url) = args.service_url.clone() {
        service.url = Some(url);
    }
    let client = ServiceClient::from_config(&service)?;

    let store = open_store(dir)?;
    let context = resolve_context(args.context.clone(), service.base_dir.clone())?;
    let save = !args.no_save;

    match args.question {
        Some(question) => {
            let outcome = answer_and_record(&client, &store, &question, &context, save).await?;
            print_outcome(&outcome, store.markers(), args.json)?;
        }
        None => interactive(&client, &store, &context, save).await?,
    }
    Ok(())
}

/// Ask `answerer` and, when `save` is set, record the turn in `store`
pub async fn answer_and_record(
    answerer: &dyn Answerer,
    store: &HistoryStore,
    question: &str,
    context: &Path,
    save: bool,
) -> Result<AskOutcome> {
    let answer = answerer.ask(question, context).await?;

    let filename = if save {
        let title = answer
            .title
            .clone()
            .unwrap_or_else(|| leading_words(question, TITLE_WORDS));
        let mut turn = ConversationTurn::new(question, answer.text.clone())
            .with_sources(answer.sources.clone());
        if !store.markers().is_marker(&title) {
            turn = turn.with_title(title);
        }
        Some(store.save_turn(&turn)?)
    } else {
        None
    };

    Ok(AskOutcome {
        question: question.to_string(),
        answer,
        filename,
    })
}

async fn interactive(
    answerer: &dyn Answerer,
    store: &HistoryStore,
    context: &Path,
    save: bool,
) -> Result<()> {
    println!(
        "{} {} (type {} to leave)",
        "Context:".dimmed(),
        context.display(),
        EXIT_WORDS.join("/").bold()
    );

    loop {
        let line = Input::<String>::new()
            .with_prompt("?")
            .allow_empty(true)
            .interact_text()?;
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if is_exit(question) {
            break;
        }

        match answer_and_record(answerer, store, question, context, save).await {
            Ok(outcome) => print_outcome(&outcome, store.markers(), false)?,
            Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
    }
    Ok(())
}

fn is_exit(input: &str) -> bool {
    EXIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

fn resolve_context(arg: Option<PathBuf>, configured: Option<PathBuf>) -> Result<PathBuf> {
    match arg.or(configured) {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Cannot determine working directory"),
    }
}

fn print_outcome(outcome: &AskOutcome, markers: &Markers, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("{}", markers.answer.cyan().bold());
    println!("{}", outcome.answer.text);
    if !outcome.answer.sources.is_empty() {
        println!();
        for source in &outcome.answer.sources {
            println!("  {} {}", "-".dimmed(), source);
        }
    }
    if let Some(filename) = &outcome.filename {
        println!("💾 {} {}", "Saved".green(), filename.dimmed());
    }
    Ok(())
}
