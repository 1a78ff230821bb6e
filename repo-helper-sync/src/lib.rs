//! # repo-helper-sync
//!
//! Generator registry, idempotent writer and the pipeline that ties them
//! together.
//!
//! Call [`resolve_and_run`] to load `repo_helper.yml` from a repository and
//! bring every managed file up to date, or [`diff::diff_repo`] to preview the
//! changes without writing.

pub mod blocks;
pub mod diff;
pub mod error;
pub mod generators;
pub mod pipeline;
pub mod registry;
pub mod requirements;
pub mod writer;

pub use diff::{diff_repo, preview, FileDiff};
pub use error::SyncError;
pub use pipeline::{resolve_and_run, run, RunOptions, SyncReport};
pub use registry::{Decision, GeneratorEntry, Position, Registry, RegistryError};
pub use writer::{FileWriter, StagedChange, WriteResult};
