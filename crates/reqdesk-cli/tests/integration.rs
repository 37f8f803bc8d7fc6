#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use reqdesk_core::id::RequirementId;
use tempfile::TempDir;

/// `reqdesk` with the config pointed into `dir` so tests never read a
/// developer's local file.
fn reqdesk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reqdesk").unwrap();
    cmd.current_dir(dir.path())
        .env("REQDESK_CONFIG", dir.path().join("reqdesk.yaml"));
    cmd
}

// ---------------------------------------------------------------------------
// reqdesk classify
// ---------------------------------------------------------------------------

#[test]
fn classify_prints_product() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .args(["classify", "ログイン画面が重い"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Product:     dashboard"))
        .stdout(predicate::str::contains("Confidence:  high"));
}

#[test]
fn classify_json_exposes_scores() {
    let dir = TempDir::new().unwrap();
    let output = reqdesk(&dir)
        .args(["--json", "classify", "Login", "Screen"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["product"], "unknown");
    assert_eq!(json["confidence"], "low");
    assert_eq!(json["perProductScores"].as_object().unwrap().len(), 5);
}

#[test]
fn classify_uses_config_catalog() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("reqdesk.yaml"),
        "catalog:\n  - key: web-app\n    display_name: web\n    keywords: [login, screen]\n",
    )
    .unwrap();
    reqdesk(&dir)
        .args(["classify", "Login Screen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Product:     web"))
        .stdout(predicate::str::contains("Matched:     2"));
}

#[test]
fn classify_requires_text() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir).arg("classify").assert().failure();
}

// ---------------------------------------------------------------------------
// reqdesk questions
// ---------------------------------------------------------------------------

#[test]
fn questions_lists_all_four() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains("current_behavior"))
        .stdout(predicate::str::contains("expected_behavior"))
        .stdout(predicate::str::contains("impact_scope"))
        .stdout(predicate::str::contains("urgency"));
}

// ---------------------------------------------------------------------------
// reqdesk generate
// ---------------------------------------------------------------------------

#[test]
fn generate_renders_document() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .args([
            "generate",
            "--request",
            "ログイン画面が重い",
            "--product",
            "dashboard",
            "--answer",
            "urgency=高",
            "--date",
            "2026-10-19",
            "--id",
            "REQ-202610-042",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **ID**: REQ-202610-042"))
        .stdout(predicate::str::contains("- **作成日**: 2026-10-19"))
        .stdout(predicate::str::contains("### 緊急度\n高\n"))
        .stdout(predicate::str::contains("### 現在の動作\n（情報収集中）\n"));
}

#[test]
fn generate_is_deterministic_with_fixed_id_and_date() {
    let dir = TempDir::new().unwrap();
    let args = [
        "generate",
        "--request",
        "CSVで発信したい",
        "--product",
        "call-runner",
        "--date",
        "2026-01-02",
        "--id",
        "REQ-202601-001",
    ];
    let a = reqdesk(&dir).args(args).output().unwrap();
    let b = reqdesk(&dir).args(args).output().unwrap();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn generate_allocates_id_for_date() {
    let dir = TempDir::new().unwrap();
    let output = reqdesk(&dir)
        .args([
            "--json",
            "generate",
            "--request",
            "x",
            "--product",
            "dashboard",
            "--date",
            "2026-03-15",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id: RequirementId = json["id"].as_str().unwrap().parse().unwrap();
    assert_eq!((id.year, id.month), (2026, 3));
    assert!((1..=999).contains(&id.seq));
    assert_eq!(json["createdAt"], "2026-03-15");
    assert_eq!(json["status"], "draft");
}

#[test]
fn generate_without_product_fails() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .args(["generate", "--request", "画面が重い"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("document generation failed"))
        .stderr(predicate::str::contains("product"));
}

#[test]
fn generate_rejects_unknown_answer_id() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .args([
            "generate",
            "--request",
            "x",
            "--product",
            "dashboard",
            "--answer",
            "severity=high",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question id"));
}

#[test]
fn generate_rejects_malformed_id() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .args([
            "generate",
            "--request",
            "x",
            "--product",
            "dashboard",
            "--id",
            "REQ-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("REQ-YYYYMM-NNN"));
}

// ---------------------------------------------------------------------------
// reqdesk webhook
// ---------------------------------------------------------------------------

#[test]
fn webhook_replays_task_event_from_file() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("event.json");
    std::fs::write(
        &payload,
        r#"{"header":{"event_type":"task.created"},"event":{"task_id":"t1","summary":"お問い合わせフォーム","description":"採用ページ"}}"#,
    )
    .unwrap();
    let output = reqdesk(&dir)
        .arg("webhook")
        .arg(&payload)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["taskId"], "t1");
    assert_eq!(json["product"], "corporate-site");
}

#[test]
fn webhook_echoes_challenge_from_stdin() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .arg("webhook")
        .write_stdin(r#"{"type":"url_verification","challenge":"abc123"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"challenge\": \"abc123\""));
}

#[test]
fn webhook_rejects_unparsable_payload() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir)
        .arg("webhook")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed payload"));
}

// ---------------------------------------------------------------------------
// reqdesk config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_builtin_tables_and_validates() {
    let dir = TempDir::new().unwrap();
    reqdesk(&dir).args(["config", "init"]).assert().success();

    let written = std::fs::read_to_string(dir.path().join("reqdesk.yaml")).unwrap();
    assert!(written.contains("recho-platform-dashboard"));

    reqdesk(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_init_does_not_overwrite() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("reqdesk.yaml"), "server:\n  port: 9000\n").unwrap();
    reqdesk(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    let content = std::fs::read_to_string(dir.path().join("reqdesk.yaml")).unwrap();
    assert!(content.contains("9000"));
}

#[test]
fn config_validate_fails_on_duplicate_keys() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("reqdesk.yaml"),
        "catalog:\n  - key: a\n    display_name: A\n    keywords: [x]\n  - key: a\n    display_name: B\n    keywords: [y]\n",
    )
    .unwrap();
    reqdesk(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("duplicate product key 'a'"));
}
