//! Loading `repo_helper.yml` from disk.

use assert_fs::prelude::*;
use predicates::prelude::*;
use repo_helper_core::{load_document, load_settings, ConfigError, SETTINGS_FILE};

#[test]
fn missing_settings_file_returns_not_found() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    let err = load_settings(repo.path()).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(predicate::str::contains("repo_helper.yml").eval(&err.to_string()));
}

#[test]
fn corrupt_yaml_returns_parse_error_with_path() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child(SETTINGS_FILE)
        .write_str("author: [unclosed\n  : : !!!")
        .expect("write");

    let err = load_document(repo.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains(SETTINGS_FILE));
}

#[test]
fn list_document_is_not_a_mapping() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child(SETTINGS_FILE).write_str("- a\n- b\n").expect("write");

    let err = load_document(repo.path()).unwrap_err();
    assert!(matches!(err, ConfigError::NotAMapping), "got: {err}");
}

#[test]
fn empty_document_fails_on_first_required_key() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child(SETTINGS_FILE).touch().expect("touch");

    let err = load_settings(repo.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { ref key } if key == "author"), "got: {err}");
}

#[test]
fn valid_document_loads_and_resolves() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child(SETTINGS_FILE)
        .write_str(
            "author: A\nemail: a@b.c\nusername: a\nmodname: demo\ncopyright_years: '2019-2020'\n\
             version: '1.2.3'\nlicense: MIT\nshort_desc: Demo\nenable_docs: true\n",
        )
        .expect("write");

    let settings = load_settings(repo.path()).expect("load");
    assert_eq!(settings.modname, "demo");
    assert!(settings.enable_docs);
    repo.child(SETTINGS_FILE).assert(predicate::path::exists());
}
