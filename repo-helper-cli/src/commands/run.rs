//! `repo-helper run`: render and write every managed file for a repository.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use repo_helper_sync::{resolve_and_run, RunOptions, SyncReport, WriteResult};

/// Arguments for `repo-helper run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Repository root containing `repo_helper.yml`.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory of `.tera` templates overriding the built-in ones.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let options = RunOptions {
            dry_run: self.dry_run,
            template_dir: self.templates,
        };
        let report = resolve_and_run(&self.path, &options)
            .with_context(|| format!("repo-helper failed for '{}'", self.path.display()))?;
        print_report(&report, self.dry_run);
        Ok(())
    }
}

fn print_report(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = report.changed().count();
    let unchanged = report.writes.len() - changed;

    for write in &report.writes {
        let path = write.path().display();
        match write {
            WriteResult::Written { .. } => println!("  {}  {path}", "✎".green().bold()),
            WriteResult::WouldWrite { .. } => println!("  {}  {path}", "~".yellow().bold()),
            WriteResult::Removed { .. } => println!("  {}  {path}", "✗".red().bold()),
            WriteResult::WouldRemove { .. } => println!("  {}  {path}", "✗".yellow()),
            WriteResult::Unchanged { .. } => {
                println!("  {}  {}", "·".bright_black(), path.to_string().bright_black())
            }
        }
    }

    if changed == 0 {
        println!("{prefix}✓ nothing to do ({} managed files)", report.managed_files.len());
    } else {
        println!(
            "{prefix}✓ {changed} changed, {unchanged} unchanged ({} managed files)",
            report.managed_files.len()
        );
    }
}
