//! `repo-helper diff`: show unified diffs for what `run` would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use repo_helper_sync::diff_repo;

/// Arguments for `repo-helper diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Repository root containing `repo_helper.yml`.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory of `.tera` templates overriding the built-in ones.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let diffs = diff_repo(&self.path, self.templates)
            .with_context(|| format!("diff failed for '{}'", self.path.display()))?;

        if diffs.is_empty() {
            println!("No differences for '{}'.", self.path.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
