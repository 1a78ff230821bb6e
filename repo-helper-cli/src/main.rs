//! repo-helper: keep a Python repository's boilerplate in step with its
//! `repo_helper.yml`.
//!
//! # Usage
//!
//! ```text
//! repo-helper [-v] run [PATH] [--dry-run] [--templates DIR]
//! repo-helper [-v] diff [PATH] [--templates DIR]
//! repo-helper generators [PATH]
//! repo-helper show [PATH]
//! repo-helper schema
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, generators::GeneratorsArgs, run::RunArgs, schema::SchemaArgs, show::ShowArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "repo-helper",
    version,
    about = "Generate and update the managed files of a Python repository",
    long_about = None,
)]
struct Cli {
    /// Log each generator decision and file operation.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render and write every managed file for a repository.
    Run(RunArgs),

    /// Show unified diffs of what `run` would change.
    Diff(DiffArgs),

    /// List the generator catalogue, optionally with decisions for a repository.
    Generators(GeneratorsArgs),

    /// Print the resolved settings as YAML.
    Show(ShowArgs),

    /// Print the JSON schema of recognised settings keys.
    Schema(SchemaArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!("repo-helper v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Generators(args) => args.run(),
        Commands::Show(args) => args.run(),
        Commands::Schema(args) => args.run(),
    }
}
