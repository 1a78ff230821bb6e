//! `repo-helper schema`: JSON schema of the recognised settings keys.

use anyhow::{Context, Result};
use clap::Args;

use repo_helper_core::schema::json_schema;

/// Arguments for `repo-helper schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {}

impl SchemaArgs {
    pub fn run(self) -> Result<()> {
        let schema = serde_json::to_string_pretty(&json_schema()).context("failed to serialise schema")?;
        println!("{schema}");
        Ok(())
    }
}
