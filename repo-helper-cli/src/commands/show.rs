//! `repo-helper show`: print the resolved settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use repo_helper_core::load_settings;

/// Arguments for `repo-helper show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Repository root containing `repo_helper.yml`.
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let settings = load_settings(&self.path)
            .with_context(|| format!("failed to load settings from '{}'", self.path.display()))?;
        let yaml = serde_yaml::to_string(&settings).context("failed to serialise settings")?;
        print!("{yaml}");
        Ok(())
    }
}
