//! Loading `repo_helper.yml` from a repository.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::{io_err, ConfigError};
use crate::resolve::resolve;
use crate::settings::Settings;

/// File name of the settings document, relative to the repository root.
pub const SETTINGS_FILE: &str = "repo_helper.yml";

/// `<repo>/repo_helper.yml`. Does not touch the filesystem.
pub fn settings_path(repo: &Path) -> PathBuf {
    repo.join(SETTINGS_FILE)
}

/// Parses the settings document without validating it.
///
/// An empty file reads as an empty mapping.
pub fn load_document(repo: &Path) -> Result<Mapping, ConfigError> {
    let path = settings_path(repo);
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    parse_document(&contents).map_err(|err| match err {
        DocumentError::Yaml(source) => ConfigError::Parse { path, source },
        DocumentError::NotAMapping => ConfigError::NotAMapping,
    })
}

/// Loads and resolves the settings for `repo`.
pub fn load_settings(repo: &Path) -> Result<Settings, ConfigError> {
    resolve(&load_document(repo)?)
}

enum DocumentError {
    Yaml(serde_yaml::Error),
    NotAMapping,
}

fn parse_document(contents: &str) -> Result<Mapping, DocumentError> {
    match serde_yaml::from_str::<Value>(contents).map_err(DocumentError::Yaml)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        _ => Err(DocumentError::NotAMapping),
    }
}
