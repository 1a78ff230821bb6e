//! Unified diff previews for `repo-helper diff`.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::SyncError;
use crate::pipeline::{self, RunOptions, SyncReport};
use crate::writer::StagedChange;

/// A single file diff. `path` is repository-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

fn unified(change: &StagedChange) -> FileDiff {
    let before = change.before.as_deref().unwrap_or_default();
    let after = change.after.as_deref().unwrap_or_default();
    let old_header = format!("a/{}", change.path.display());
    let new_header = format!("b/{}", change.path.display());
    let unified_diff = TextDiff::from_lines(before, after)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    FileDiff {
        path: change.path.clone(),
        unified_diff,
    }
}

/// Diffs for every change a dry run staged, sorted by path.
pub fn preview(report: &SyncReport) -> Vec<FileDiff> {
    report.changes.iter().map(unified).collect()
}

/// Dry-runs the pipeline against `repo` and returns what it would change.
/// Nothing is written.
pub fn diff_repo(repo: &Path, template_dir: Option<PathBuf>) -> Result<Vec<FileDiff>, SyncError> {
    let options = RunOptions {
        dry_run: true,
        template_dir,
    };
    let report = pipeline::resolve_and_run(repo, &options)?;
    Ok(preview(&report))
}
