//! End-to-end tests for the chatlog binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

/// Command isolated from any real config: cwd and HOME point at `sandbox`
fn chatlog(sandbox: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chatlog").unwrap();
    cmd.current_dir(sandbox)
        .env("HOME", sandbox)
        .env_remove("CHATLOG_HISTORY_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn history() -> (TempDir, std::path::PathBuf) {
    let sandbox = tempdir().unwrap();
    let dir = sandbox.path().join("history");
    fs::create_dir(&dir).unwrap();
    (sandbox, dir)
}

fn ls_json(sandbox: &Path, dir: &Path) -> Vec<Value> {
    let output = chatlog(sandbox)
        .arg("--dir")
        .arg(dir)
        .args(["ls", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn save_then_list_round_trips() {
    let (sandbox, dir) = history();

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["save", "What is X?", "# Detail\nX is Y."])
        .assert()
        .success()
        .stdout(predicate::str::contains("_message.md"));

    let records = ls_json(sandbox.path(), &dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["question"], "What is X?");
    assert_eq!(records[0]["answer"], "## Detail\nX is Y.");
}

#[test]
fn show_prints_the_answer() {
    let (sandbox, dir) = history();
    fs::write(
        dir.join("20240115_143022_123456_message.md"),
        "# Pergunta\n\nWhat is X?\n\n# Resposta\n\nX is Y.\n",
    )
    .unwrap();

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["show", "20240115_143022_123456_message.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("X is Y."));

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["show", "20240115_143022_000000_message.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_ignores_foreign_files_and_orders_newest_first() {
    let (sandbox, dir) = history();
    let doc = "# Pergunta\n\nQ\n\n# Resposta\n\nA\n";
    fs::write(dir.join("20240101_000000_000000_message.md"), doc).unwrap();
    fs::write(dir.join("20240301_000000_000000_message.md"), doc).unwrap();
    fs::write(dir.join("notes.md"), doc).unwrap();
    fs::write(dir.join("20240201_000000_000000_message.txt"), doc).unwrap();

    let records = ls_json(sandbox.path(), &dir);
    let names: Vec<&str> = records
        .iter()
        .map(|r| r["filename"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "20240301_000000_000000_message.md",
            "20240101_000000_000000_message.md"
        ]
    );
}

#[test]
fn list_filters_by_day() {
    let (sandbox, dir) = history();
    let doc = "# Pergunta\n\nQ\n\n# Resposta\n\nA\n";
    fs::write(dir.join("20240115_000000_000000_message.md"), doc).unwrap();
    fs::write(dir.join("20240115_235959_999999_message.md"), doc).unwrap();
    fs::write(dir.join("20240116_000000_000000_message.md"), doc).unwrap();

    let output = chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["ls", "--json", "--from", "2024-01-15", "--to", "2024-01-15"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn save_reads_answer_from_file() {
    let (sandbox, dir) = history();
    let answer = sandbox.path().join("answer.md");
    fs::write(&answer, "From a file.\n").unwrap();

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["save", "Q?", "--answer-file"])
        .arg(&answer)
        .assert()
        .success();

    let records = ls_json(sandbox.path(), &dir);
    assert_eq!(records[0]["answer"], "From a file.");
}

#[test]
fn save_reads_question_from_file_with_inline_answer() {
    let (sandbox, dir) = history();
    let question = sandbox.path().join("question.md");
    fs::write(&question, "Question from a file?\n").unwrap();

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["save", "--question-file"])
        .arg(&question)
        .arg("the answer")
        .assert()
        .success()
        .stdout(predicate::str::contains("Turn saved"));

    let records = ls_json(sandbox.path(), &dir);
    assert_eq!(records[0]["question"], "Question from a file?");
    assert_eq!(records[0]["answer"], "the answer");
}

#[test]
fn list_fails_on_missing_directory() {
    let sandbox = tempdir().unwrap();

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(sandbox.path().join("absent"))
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn list_rejects_bad_dates() {
    let (sandbox, dir) = history();

    chatlog(sandbox.path())
        .arg("--dir")
        .arg(&dir)
        .args(["ls", "--from", "last tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn init_then_save_uses_local_history() {
    let sandbox = tempdir().unwrap();

    chatlog(sandbox.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Initialized chatlog"));
    assert!(sandbox.path().join(".chatlog/config.toml").is_file());

    chatlog(sandbox.path())
        .args(["save", "Q", "A", "--title", "First"])
        .assert()
        .success();

    let saved = fs::read_dir(sandbox.path().join(".chatlog/history"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with("_message.md"))
        .count();
    assert_eq!(saved, 1);
}
