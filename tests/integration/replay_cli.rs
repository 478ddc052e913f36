//! Tests for the `snapshot-preview replay` binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TAPE: &str = r#"{"at_ms":0,"event":{"type":"url:changed","payload":"http://localhost/app"}}
{"at_ms":0,"event":{"type":"show:snapshot","payload":{"id":1,"url":"http://localhost/snap","viewportWidth":320,"viewportHeight":480,"snapshots":[{"name":"after","body":"<body>snap</body>"}]}}}
{"at_ms":0,"event":{"type":"pin:snapshot","payload":{"id":1,"snapshots":[{"name":"after","body":"<body>snap</body>"}]}}}
"#;

fn cli(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("snapshot-preview").expect("binary should build");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_replay_prints_pinned_report() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tape = dir.path().join("tape.jsonl");
    fs::write(&tape, TAPE).unwrap();

    cli(&dir)
        .arg("replay")
        .arg(&tape)
        .arg("--settle-ms")
        .arg("10")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"pinned\""))
        .stdout(predicate::str::contains("DOM Snapshot (pinned)"))
        .stdout(predicate::str::contains("\"url\": \"http://localhost/snap\""));
}

#[test]
fn test_replay_honors_config_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tape = dir.path().join("tape.jsonl");
    fs::write(&tape, TAPE).unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[messages]\npinned_title = \"Frozen\"\n").unwrap();

    cli(&dir)
        .arg("--config")
        .arg(&config)
        .arg("replay")
        .arg(&tape)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Frozen\""));
}

#[test]
fn test_replay_rejects_bad_tape() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tape = dir.path().join("tape.jsonl");
    fs::write(&tape, "{\"at_ms\":0,\"event\":{\"type\":\"bogus\"}}\n").unwrap();

    cli(&dir)
        .arg("replay")
        .arg(&tape)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}
