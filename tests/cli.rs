//! End-to-end tests for the `exemplar` binary
//!
//! Only offline commands are exercised; nothing here talks to a backend.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_corpus() -> Value {
    json!([
        { "description": "Bouncing ball", "code": "ball();" },
        { "description": "Falling block puzzle in the style of Tetris", "code": "blocks();" },
        { "description": "Fractal Fern", "code": "fern();" },
        { "description": "Tetris", "code": "tetris();" },
        { "description": "Analog clock", "code": "clock();" },
        { "description": "Snake game", "code": "snake();" }
    ])
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn corpus(&self, corpus: &Value) -> PathBuf {
        self.write("corpus.json", &corpus.to_string())
    }

    /// Command isolated from the user's config and environment
    fn command(&self, config: Option<&Path>) -> Command {
        let mut cmd = Command::cargo_bin("exemplar").unwrap();
        let config = config
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.dir.path().join("absent.toml"));
        cmd.arg("--config")
            .arg(config)
            .env_remove("EXEMPLAR_CORPUS")
            .env_remove("ANTHROPIC_API_KEY");
        cmd
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn rank_json_puts_exact_title_first() {
    let ws = Workspace::new();
    let corpus = ws.corpus(&fixture_corpus());

    let output = ws
        .command(None)
        .args(["rank", "Tetris", "--limit", "5", "--json", "--corpus"])
        .arg(&corpus)
        .output()
        .unwrap();
    assert!(output.status.success());

    let ranked = stdout_json(&output);
    let descriptions: Vec<&str> = ranked
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions[0], "Tetris");
    assert!(descriptions.contains(&"Falling block puzzle in the style of Tetris"));
    assert!(descriptions.len() <= 5);
}

#[test]
fn rank_uses_bundled_corpus_by_default() {
    let ws = Workspace::new();

    let output = ws
        .command(None)
        .args(["rank", "Fracal Fern", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)[0]["description"], "Fractal Fern");
}

#[test]
fn rank_blank_query_returns_corpus_prefix() {
    let ws = Workspace::new();
    let samples: Vec<Value> = (0..20)
        .map(|i| json!({ "description": format!("Sample {}", i), "code": format!("s{}();", i) }))
        .collect();
    let corpus = ws.corpus(&Value::Array(samples));

    let output = ws
        .command(None)
        .args(["rank", "   ", "--json", "--corpus"])
        .arg(&corpus)
        .output()
        .unwrap();
    assert!(output.status.success());

    let ranked = stdout_json(&output);
    let ranked = ranked.as_array().unwrap();
    assert_eq!(ranked.len(), 12);
    assert_eq!(ranked[0]["description"], "Sample 0");
    assert_eq!(ranked[11]["description"], "Sample 11");
}

#[test]
fn rank_reports_no_matches() {
    let ws = Workspace::new();
    let corpus = ws.corpus(&fixture_corpus());

    ws.command(None)
        .args(["rank", "spreadsheet", "--corpus"])
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("No examples match"));
}

#[test]
fn rank_fails_on_missing_corpus() {
    let ws = Workspace::new();

    ws.command(None)
        .args(["rank", "Tetris", "--corpus"])
        .arg(ws.dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load corpus"));
}

#[test]
fn prompt_json_pairs_examples_with_code_objects() {
    let ws = Workspace::new();
    let corpus = ws.corpus(&fixture_corpus());

    let output = ws
        .command(None)
        .args(["prompt", "Tetris", "--json", "--corpus"])
        .arg(&corpus)
        .output()
        .unwrap();
    assert!(output.status.success());

    let messages = stdout_json(&output);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "Tetris");
    assert_eq!(messages[2]["role"], "assistant");

    let code: Value = serde_json::from_str(messages[2]["content"].as_str().unwrap()).unwrap();
    assert_eq!(code, json!({ "code": "tetris();" }));
}

#[test]
fn prompt_with_budget_of_system_prompt_is_system_only() {
    let ws = Workspace::new();
    let corpus = ws.corpus(&fixture_corpus());
    let config = ws.write("config.toml", "[prompt]\nsystem_prompt = \"Sketch it.\"\n");

    let output = ws
        .command(Some(&config))
        .args(["prompt", "Tetris", "--json", "--budget", "10", "--corpus"])
        .arg(&corpus)
        .output()
        .unwrap();
    assert!(output.status.success());

    let messages = stdout_json(&output);
    assert_eq!(messages, json!([{ "role": "system", "content": "Sketch it." }]));
}

#[test]
fn info_reports_corpus_size() {
    let ws = Workspace::new();
    let corpus = ws.corpus(&fixture_corpus());

    ws.command(None)
        .arg("info")
        .arg("--corpus")
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples: 6"))
        .stdout(predicate::str::contains("Claude: not configured"));
}

#[test]
fn rank_tolerates_null_fields_in_corpus() {
    let ws = Workspace::new();
    let corpus = ws.write(
        "corpus.json",
        r#"[{"description": "Clock", "code": null}, {"description": "Tetris", "code": "tetris();"}]"#,
    );

    let output = ws
        .command(None)
        .args(["rank", "clock", "--json", "--corpus"])
        .arg(&corpus)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!([{ "description": "Clock", "code": "" }]));
}

#[test]
fn chat_exits_on_command_and_on_eof() {
    let ws = Workspace::new();
    let corpus = ws.corpus(&fixture_corpus());

    ws.command(None)
        .arg("chat")
        .arg("--corpus")
        .arg(&corpus)
        .write_stdin("/history\n/exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 accepted turns in context"))
        .stdout(predicate::str::contains("Goodbye"));

    ws.command(None)
        .arg("chat")
        .arg("--corpus")
        .arg(&corpus)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Goodbye").not());
}
