//! Idempotent writer shared by every generator.
//!
//! ## Full replace
//!
//! 1. Clean the rendered text ([`clean_text`]): LF line endings, no trailing
//!    whitespace, exactly one trailing newline.
//! 2. Compare with the current content → skip if identical.
//! 3. Write to `<path>.repo_helper.tmp`, then rename over the target.
//!
//! ## Incremental merge
//!
//! [`append_missing_blocks`] appends only the required blocks a file lacks and
//! never reorders or removes existing content. The result is written with
//! [`FileWriter::write_exact`] so the trailing blank line survives.
//!
//! ## Dry runs
//!
//! Nothing touches disk. Writes are staged in memory and [`FileWriter::read`]
//! returns staged content, so later generators see what earlier ones would
//! have written.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file operation. Paths are repository-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File already had exactly this content.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
    /// A stale managed file was deleted.
    Removed { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been deleted.
    WouldRemove { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path }
            | WriteResult::Removed { path }
            | WriteResult::WouldRemove { path } => path,
        }
    }

    /// Whether the file on disk changed (or would have).
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

/// A change held back by a dry run: `before` is what was on disk when the run
/// started, `after` is the final staged content (`None` = removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChange {
    pub path: PathBuf,
    pub before: Option<String>,
    pub after: Option<String>,
}

// ---------------------------------------------------------------------------
// Pure text helpers
// ---------------------------------------------------------------------------

/// LF line endings, trailing whitespace stripped from every line, trailing
/// blank lines dropped, single final newline.
pub fn clean_text(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalized.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Incremental merge for block-structured config files.
///
/// Starts from `existing`, or from `preamble` when the file does not exist.
/// Each block not already present verbatim (as consecutive lines) is appended
/// followed by a blank line; a blank line is inserted first if the text does
/// not already end with one.
pub fn append_missing_blocks(existing: Option<&str>, preamble: &str, blocks: &[String]) -> String {
    let mut text = match existing {
        Some(current) => current.replace("\r\n", "\n"),
        None => preamble.to_owned(),
    };

    for block in blocks {
        if contains_block(&text, block) {
            continue;
        }
        if !text.is_empty() && !text.ends_with("\n\n") {
            text.push_str(if text.ends_with('\n') { "\n" } else { "\n\n" });
        }
        text.push_str(block.trim_end_matches('\n'));
        text.push_str("\n\n");
    }
    text
}

fn contains_block(text: &str, block: &str) -> bool {
    let needle: Vec<&str> = block.lines().map(str::trim_end).collect();
    if needle.is_empty() {
        return true;
    }
    let haystack: Vec<&str> = text.lines().map(str::trim_end).collect();
    haystack.windows(needle.len()).any(|window| window == needle.as_slice())
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.repo_helper.tmp", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

/// Rejects absolute paths and `..` so generators stay inside the repository.
fn checked_relative(rel: &str) -> Result<PathBuf, SyncError> {
    let path = Path::new(rel);
    let inside = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if rel.is_empty() || !inside {
        return Err(SyncError::OutsideRepo { path: path.to_path_buf() });
    }
    Ok(path.to_path_buf())
}

// ---------------------------------------------------------------------------
// FileWriter
// ---------------------------------------------------------------------------

/// Repository-rooted writer. One per pipeline run.
#[derive(Debug)]
pub struct FileWriter {
    root: PathBuf,
    dry_run: bool,
    /// Dry-run view of the tree: `None` = removed.
    staged: BTreeMap<PathBuf, Option<String>>,
    /// On-disk content the first time a path was staged.
    originals: BTreeMap<PathBuf, Option<String>>,
    results: Vec<WriteResult>,
}

impl FileWriter {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        FileWriter {
            root: root.into(),
            dry_run,
            staged: BTreeMap::new(),
            originals: BTreeMap::new(),
            results: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Current content of `rel`, including anything staged by this run.
    pub fn read(&self, rel: &str) -> Result<Option<String>, SyncError> {
        let rel = checked_relative(rel)?;
        if let Some(staged) = self.staged.get(&rel) {
            return Ok(staged.clone());
        }
        read_optional(&self.root.join(&rel))
    }

    pub fn exists(&self, rel: &str) -> Result<bool, SyncError> {
        Ok(self.read(rel)?.is_some())
    }

    /// Full replace with [`clean_text`] applied first.
    pub fn write_clean(&mut self, rel: &str, content: &str) -> Result<WriteResult, SyncError> {
        self.write_exact(rel, &clean_text(content))
    }

    /// Full replace of the exact text (line endings normalised only).
    pub fn write_exact(&mut self, rel: &str, content: &str) -> Result<WriteResult, SyncError> {
        let rel_path = checked_relative(rel)?;
        let content = content.replace("\r\n", "\n");

        let result = if self.read(rel)?.as_deref() == Some(content.as_str()) {
            tracing::debug!("unchanged: {rel}");
            WriteResult::Unchanged { path: rel_path }
        } else if self.dry_run {
            tracing::info!("[dry-run] would write: {rel}");
            self.stage(&rel_path, Some(content))?;
            WriteResult::WouldWrite { path: rel_path }
        } else {
            atomic_write(&self.root.join(&rel_path), &content)?;
            tracing::info!("wrote: {rel}");
            WriteResult::Written { path: rel_path }
        };

        self.results.push(result.clone());
        Ok(result)
    }

    /// Writes `content` (cleaned) only when `rel` does not exist yet.
    pub fn write_if_absent(&mut self, rel: &str, content: &str) -> Result<WriteResult, SyncError> {
        if self.exists(rel)? {
            let result = WriteResult::Unchanged { path: checked_relative(rel)? };
            self.results.push(result.clone());
            return Ok(result);
        }
        self.write_clean(rel, content)
    }

    /// Deletes `rel` if present. Returns `None` when there was nothing to do.
    pub fn remove(&mut self, rel: &str) -> Result<Option<WriteResult>, SyncError> {
        let rel_path = checked_relative(rel)?;
        if !self.exists(rel)? {
            return Ok(None);
        }

        let result = if self.dry_run {
            tracing::info!("[dry-run] would remove: {rel}");
            self.stage(&rel_path, None)?;
            WriteResult::WouldRemove { path: rel_path }
        } else {
            let abs = self.root.join(&rel_path);
            std::fs::remove_file(&abs).map_err(|e| io_err(&abs, e))?;
            tracing::info!("removed: {rel}");
            WriteResult::Removed { path: rel_path }
        };

        self.results.push(result.clone());
        Ok(Some(result))
    }

    /// Sets the executable bits on `rel` (unix only; no-op in dry runs).
    pub fn make_executable(&self, rel: &str) -> Result<(), SyncError> {
        if self.dry_run {
            return Ok(());
        }
        let abs = self.root.join(checked_relative(rel)?);
        set_executable(&abs)
    }

    /// Every result recorded so far, in write order.
    pub fn results(&self) -> &[WriteResult] {
        &self.results
    }

    /// Changes a dry run would have made, sorted by path.
    pub fn staged_changes(&self) -> Vec<StagedChange> {
        self.staged
            .iter()
            .filter_map(|(path, after)| {
                let before = self.originals.get(path).cloned().flatten();
                (before != *after).then(|| StagedChange {
                    path: path.clone(),
                    before,
                    after: after.clone(),
                })
            })
            .collect()
    }

    pub fn into_results(self) -> Vec<WriteResult> {
        self.results
    }

    fn stage(&mut self, rel: &Path, content: Option<String>) -> Result<(), SyncError> {
        if !self.originals.contains_key(rel) {
            let on_disk = read_optional(&self.root.join(rel))?;
            self.originals.insert(rel.to_path_buf(), on_disk);
        }
        self.staged.insert(rel.to_path_buf(), content);
        Ok(())
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), SyncError> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path).map_err(|e| io_err(path, e))?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms).map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), SyncError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
