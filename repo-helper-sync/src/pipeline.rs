//! Pipeline runner: resolve settings, walk the registry, collect the
//! managed-file set.
//!
//! A failing generator aborts the run. Files written before the failure stay
//! on disk; re-running after fixing the cause converges.

use std::path::{Path, PathBuf};

use repo_helper_core::{load_settings, Settings, SETTINGS_FILE};
use repo_helper_renderer::TemplateEngine;

use crate::error::SyncError;
use crate::generators::{copy_docs_styling, Generation};
use crate::registry::{Decision, Registry};
use crate::writer::{FileWriter, StagedChange, WriteResult};

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stage writes in memory instead of touching the repository.
    pub dry_run: bool,
    /// Directory of `.tera` files overriding the embedded templates.
    pub template_dir: Option<PathBuf>,
}

/// What a run did.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Every managed path in run order, ending with the settings file.
    pub managed_files: Vec<String>,
    /// One entry per file operation.
    pub writes: Vec<WriteResult>,
    /// Dry runs only: the content changes that were held back.
    pub changes: Vec<StagedChange>,
}

impl SyncReport {
    /// Writes that changed (or would change) a file.
    pub fn changed(&self) -> impl Iterator<Item = &WriteResult> {
        self.writes.iter().filter(|w| w.is_change())
    }
}

/// Whether the styling copy runs ahead of the registry.
fn copies_docs_styling(settings: &Settings) -> bool {
    settings.enable_docs && !settings.preserve_custom_theme
}

/// Runs every enabled generator against `repo` with already-resolved
/// settings.
pub fn run(repo: &Path, settings: &Settings, options: &RunOptions) -> Result<SyncReport, SyncError> {
    let registry = Registry::builtin()?;
    let engine = TemplateEngine::new(options.template_dir.as_deref())?;
    let gen = Generation::new(repo, settings, &engine)?;
    let mut writer = FileWriter::new(repo, options.dry_run);
    let mut managed_files = Vec::new();

    if copies_docs_styling(settings) {
        let files = copy_docs_styling(&gen, &mut writer).map_err(|e| SyncError::Generator {
            generator: "docs_styling",
            source: Box::new(e),
        })?;
        managed_files.extend(files);
    }

    for (entry, decision) in registry.plan(settings) {
        if decision != Decision::Run {
            tracing::debug!("skipping {}: {decision}", entry.name);
            continue;
        }
        tracing::debug!("running {}", entry.name);
        let files = (entry.generate)(&gen, &mut writer).map_err(|e| SyncError::Generator {
            generator: entry.name,
            source: Box::new(e),
        })?;
        managed_files.extend(files);
    }

    managed_files.push(SETTINGS_FILE.to_owned());

    let changes = writer.staged_changes();
    Ok(SyncReport {
        managed_files,
        writes: writer.into_results(),
        changes,
    })
}

/// Loads `repo_helper.yml` from `repo`, resolves it and runs the pipeline.
///
/// Settings errors surface before any file is touched.
pub fn resolve_and_run(repo: &Path, options: &RunOptions) -> Result<SyncReport, SyncError> {
    let settings = load_settings(repo)?;
    run(repo, &settings, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::settings;

    #[test]
    fn styling_copy_needs_docs_and_no_custom_theme() {
        assert!(!copies_docs_styling(&settings("")));
        assert!(copies_docs_styling(&settings("enable_docs: true\n")));
        assert!(!copies_docs_styling(&settings(
            "enable_docs: true\npreserve_custom_theme: true\n"
        )));
    }

    #[test]
    fn settings_file_closes_the_managed_set() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let report = run(
            dir.path(),
            &settings(""),
            &RunOptions {
                dry_run: true,
                template_dir: None,
            },
        )
        .expect("run");
        assert_eq!(report.managed_files.last().map(String::as_str), Some(SETTINGS_FILE));
        assert_eq!(report.managed_files.first().map(String::as_str), Some("lint_roller.sh"));
        assert_eq!(std::fs::read_dir(dir.path()).expect("read_dir").count(), 0);
    }
}
