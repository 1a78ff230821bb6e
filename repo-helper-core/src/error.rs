//! Error types for repo-helper-core.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading or resolving `repo_helper.yml`.
///
/// Any of these aborts a run before a single managed file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document did not exist at the expected path.
    #[error("settings file not found at {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading the settings document.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with file path and serde_yaml's line context.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The top level of the document was a list or a scalar.
    #[error("settings document must be a mapping of keys to values")]
    NotAMapping,

    /// A required key was absent.
    #[error("missing required setting '{key}'")]
    Missing { key: String },

    /// A key held a value of the wrong fundamental type.
    #[error("setting '{key}' must be {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A key had the right type but failed a declared constraint.
    #[error("invalid value for setting '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
