//! Error types for repo-helper-sync.

use std::path::PathBuf;

use thiserror::Error;

use repo_helper_core::ConfigError;
use repo_helper_renderer::RenderError;

use crate::registry::RegistryError;

/// All errors that can arise from a pipeline run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The settings document is missing, malformed or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A template is missing or references an undefined variable.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generator tried to write outside the repository.
    #[error("refusing to write outside the repository: {path}")]
    OutsideRepo { path: PathBuf },

    /// The generator catalogue is inconsistent.
    #[error("invalid generator registry: {0}")]
    Registry(#[from] RegistryError),

    /// A generator failed; `generator` is its exclusion name.
    #[error("generator '{generator}' failed: {source}")]
    Generator {
        generator: &'static str,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// The innermost error, past any [`SyncError::Generator`] wrappers.
    pub fn root(&self) -> &SyncError {
        match self {
            SyncError::Generator { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
