//! Error types for repo-helper-renderer.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A named template is missing or failed to render (for example an
    /// undefined variable).
    #[error("template '{name}' failed to render: {}", cause_chain(.source))]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// Embedded or user templates failed to parse when the engine was built.
    #[error("failed to load templates: {}", cause_chain(.0))]
    Load(#[source] tera::Error),

    /// Building the tera context from settings failed.
    #[error("context serialization error: {0}")]
    Context(#[source] tera::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tera keeps the useful part ("Variable `x` not found") in the source chain.
fn cause_chain(err: &tera::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
