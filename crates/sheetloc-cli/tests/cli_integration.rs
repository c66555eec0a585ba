use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

mod helpers;
use helpers::*;

fn bin_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sheetloc").expect("binary built");
    cmd.current_dir(cwd)
        .env_remove("SHEETLOC_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn run_ok(cwd: &Path, args: &[&str]) -> String {
    let assert = bin_cmd(cwd).args(args).assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

#[test]
fn help_works() {
    let dir = tempfile::tempdir().unwrap();
    bin_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync i18next JSON locales"));
}

#[test]
fn sync_against_csv_table_updates_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    sync_fixture(dir.path());

    let out = run_ok(
        dir.path(),
        &["--no-color", "sync", "--path", "locales", "--table-csv", "sheet.csv"],
    );

    assert_no_ansi(&out, "--no-color must not emit escapes");
    for needle in [
        "+ creating common$$apple_one",
        "~ updating common$$hello en",
        "- pruning common$$gone",
        "Sync complete!",
        "Added: 1 (common)",
        "Updated: 1 (common)",
        "Reused: 0",
        "Pruned: 1 (common)",
    ] {
        assert_contains_with_context(&out, needle, "sync output");
    }

    let en = std::fs::read_to_string(dir.path().join("locales/en/common.json")).unwrap();
    assert_eq!(en, "{\n  \"hello\": \"Hi there\",\n  \"apple_one\": \"Apple\"\n}\n");
    let sheet = std::fs::read_to_string(dir.path().join("sheet.csv")).unwrap();
    assert_contains_with_context(&sheet, "common,gone,,FALSE,사라짐,Gone", "pruned row");
    assert_contains_with_context(&sheet, "common,apple,단수,TRUE,,Apple,", "appended row");
}

#[test]
fn second_sync_reports_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    sync_fixture(dir.path());
    let args = ["--no-color", "sync", "-p", "locales", "--table-csv", "sheet.csv"];
    run_ok(dir.path(), &args);

    let out = run_ok(dir.path(), &args);
    assert_contains_with_context(&out, "No changes detected", "second run");
    assert!(!out.contains("Sync complete!"), "{out}");
}

#[test]
fn json_dry_run_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    sync_fixture(dir.path());
    let before = std::fs::read_to_string(dir.path().join("sheet.csv")).unwrap();

    let out = run_ok(
        dir.path(),
        &[
            "sync",
            "--path",
            "locales",
            "--table-csv",
            "sheet.csv",
            "--dry-run",
            "--format",
            "json",
        ],
    );

    let report: serde_json::Value = serde_json::from_str(&out).expect("stdout is JSON");
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["added"]["count"], 1);
    assert_eq!(report["pruned"]["namespaces"][0], "common");
    assert_eq!(report["rows_appended"], 1);
    assert_eq!(report["pages"], 0);
    assert_eq!(std::fs::read_to_string(dir.path().join("sheet.csv")).unwrap(), before);
}

#[test]
fn invalid_range_fails_before_io() {
    let dir = tempfile::tempdir().unwrap();
    bin_cmd(dir.path())
        .args([
            "sync",
            "--path",
            "missing",
            "--table-csv",
            "missing.csv",
            "--range",
            "Sheet1!",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid range"));
}

#[test]
fn missing_token_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    sync_fixture(dir.path());
    bin_cmd(dir.path())
        .args(["sync", "--path", "locales", "--spreadsheet-id", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no access token"));
}

#[test]
fn config_file_supplies_path_and_table_defaults() {
    let dir = tempfile::tempdir().unwrap();
    sync_fixture(dir.path());
    write_file(
        dir.path(),
        "sheetloc.toml",
        "path = \"locales\"\nrange = \"Sheet1\"\n[sync]\ndry_run = true\n",
    );

    let out = run_ok(dir.path(), &["--no-color", "sync", "--table-csv", "sheet.csv"]);
    assert_contains_with_context(&out, "Added: 1 (common)", "config-driven run");
    let en = std::fs::read_to_string(dir.path().join("locales/en/common.json")).unwrap();
    assert_eq!(en, r#"{"hello":"Hello","apple_one":"Apple"}"#);
}

#[test]
fn schema_dumps_report_schemas() {
    let dir = tempfile::tempdir().unwrap();
    bin_cmd(dir.path())
        .args(["schema", "--out-dir", "schemas"])
        .assert()
        .success();
    for name in ["sync_report.schema.json", "sync_event.schema.json"] {
        let text = std::fs::read_to_string(dir.path().join("schemas").join(name)).unwrap();
        let schema: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(schema.get("properties").is_some(), "{name}");
    }
}

#[test]
fn schema_rejects_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "sheetloc.toml", "path = [\n");
    bin_cmd(dir.path())
        .args(["schema", "--out-dir", "schemas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sheetloc.toml"));
    assert!(!dir.path().join("schemas").exists());
}
