//! `repo-helper generators`: the generator catalogue in run order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use repo_helper_core::load_settings;
use repo_helper_sync::{Decision, GeneratorEntry, Position, Registry};

/// Arguments for `repo-helper generators`.
#[derive(Args, Debug)]
pub struct GeneratorsArgs {
    /// Repository whose settings decide which generators run.
    pub path: Option<PathBuf>,
}

#[derive(Tabled)]
struct CatalogueRow {
    #[tabled(rename = "#")]
    order: usize,
    #[tabled(rename = "generator")]
    name: &'static str,
    #[tabled(rename = "requires")]
    requires: String,
    #[tabled(rename = "runs last")]
    last: &'static str,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(inline)]
    entry: CatalogueRow,
    #[tabled(rename = "decision")]
    decision: String,
}

fn catalogue_row(order: usize, entry: &GeneratorEntry) -> CatalogueRow {
    let requires = entry
        .requires
        .iter()
        .map(|flag| flag.key())
        .collect::<Vec<_>>()
        .join(", ");
    CatalogueRow {
        order: order + 1,
        name: entry.name,
        requires: if requires.is_empty() { "-".to_owned() } else { requires },
        last: if entry.position == Position::Last { "yes" } else { "" },
    }
}

fn decision_label(decision: Decision) -> String {
    match decision {
        Decision::Run => "run".green().bold().to_string(),
        Decision::Excluded => "excluded".yellow().to_string(),
        Decision::FlagDisabled(_) => decision.to_string().bright_black().to_string(),
    }
}

impl GeneratorsArgs {
    pub fn run(self) -> Result<()> {
        let registry = Registry::builtin().context("built-in generator registry is invalid")?;

        let mut table = match self.path {
            None => Table::new(
                registry
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| catalogue_row(i, entry)),
            ),
            Some(path) => {
                let settings = load_settings(&path)
                    .with_context(|| format!("failed to load settings from '{}'", path.display()))?;
                Table::new(
                    registry
                        .plan(&settings)
                        .into_iter()
                        .enumerate()
                        .map(|(i, (entry, decision))| PlanRow {
                            entry: catalogue_row(i, entry),
                            decision: decision_label(decision),
                        }),
                )
            }
        };
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
