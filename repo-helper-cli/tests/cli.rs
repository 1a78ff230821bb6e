use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const SETTINGS: &str = "author: Jane Doe\nemail: jane@example.com\nusername: janedoe\n\
    modname: widget-kit\ncopyright_years: 2020\nversion: 1.2.3\nlicense: MIT\n\
    short_desc: Widgets, kitted.\nenable_tests: true\n";

fn repo_helper() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_repo-helper"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn scratch_repo() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("repo_helper.yml"), SETTINGS).expect("settings");
    dir
}

fn file_count(root: &Path) -> usize {
    fs::read_dir(root).expect("read_dir").count()
}

#[test]
fn run_writes_files_and_second_run_is_quiet() {
    let dir = scratch_repo();

    repo_helper()
        .arg("run")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("setup.py").and(contains("changed")));
    assert!(dir.path().join("tox.ini").is_file());
    assert!(dir.path().join("tests/requirements.txt").is_file());

    repo_helper()
        .arg("run")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("nothing to do"));
}

#[test]
fn dry_run_leaves_the_repository_untouched() {
    let dir = scratch_repo();

    repo_helper()
        .args(["run", "--dry-run"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("[dry-run]").and(contains("tox.ini")));
    assert_eq!(file_count(dir.path()), 1);
}

#[test]
fn diff_prints_unified_diffs_then_nothing_after_run() {
    let dir = scratch_repo();

    repo_helper()
        .arg("diff")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("--- a/tox.ini").and(contains("+++ b/tox.ini")));
    assert_eq!(file_count(dir.path()), 1);

    repo_helper().arg("run").arg(dir.path()).assert().success();
    repo_helper()
        .arg("diff")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("No differences"));
}

#[test]
fn invalid_settings_fail_without_writing() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("repo_helper.yml"), "author: Jane Doe\n").expect("settings");

    repo_helper()
        .arg("run")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(contains("email"));
    assert_eq!(file_count(dir.path()), 1);
}

#[test]
fn missing_settings_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    repo_helper()
        .arg("run")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(contains("repo_helper.yml"));
}

#[test]
fn generators_lists_the_catalogue_with_decisions() {
    repo_helper()
        .arg("generators")
        .assert()
        .success()
        .stdout(contains("isort").and(contains("enable_docs")));

    let dir = scratch_repo();
    repo_helper()
        .arg("generators")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("decision").and(contains("enable_docs is false")));
}

#[test]
fn show_prints_resolved_settings() {
    let dir = scratch_repo();
    repo_helper()
        .arg("show")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("import_name: widget_kit").and(contains("tox_py_versions:")));
}

#[test]
fn schema_lists_required_keys() {
    let output = repo_helper().arg("schema").output().expect("schema");
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let required = schema["required"].as_array().expect("required list");
    assert!(required.iter().any(|key| key == "modname"));
    assert!(schema["properties"]["enable_docs"].is_object());
}
