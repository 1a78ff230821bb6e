//! Code-style tooling: lint_roller, pylint, yapf, pre-commit and isort.

use std::collections::BTreeSet;

use crate::error::SyncError;
use crate::requirements::parse_requirements;
use crate::writer::FileWriter;

use super::{write_template, Generation};

/// Always treated as third party, whatever the requirements say.
const KNOWN_THIRD_PARTY: &[&str] = &["github", "requests"];

pub fn lint_roller(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let rel = write_template(gen, writer, "lint_roller.sh.tera", "lint_roller.sh")?;
    writer.make_executable(&rel)?;
    Ok(vec![rel])
}

pub fn pylintrc(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "pylintrc.tera", ".pylintrc")?])
}

pub fn yapf(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "style.yapf.tera", ".style.yapf")?])
}

pub fn pre_commit(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(
        gen,
        writer,
        "pre_commit_config.yaml.tera",
        ".pre-commit-config.yaml",
    )?])
}

/// Top-level module name isort would see for a requirement.
fn import_style(name: &str) -> String {
    name.to_ascii_lowercase().replace(['-', '.'], "_")
}

/// Names listed under `known_third_party` in an existing `.isort.cfg`,
/// inline after the `=` or on indented continuation lines.
fn listed_third_party(cfg: &str) -> Vec<String> {
    let mut lines = cfg.lines();
    let Some(first) = lines.find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim_end() == "known_third_party").then_some(value)
    }) else {
        return Vec::new();
    };

    let continuation =
        lines.take_while(|line| line.starts_with([' ', '\t']) && !line.trim().is_empty());
    std::iter::once(first)
        .chain(continuation)
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Third-party module names for `.isort.cfg`: whatever the file already
/// lists, plus the requirement files as they stand after every other
/// generator has run.
fn known_third_party(gen: &Generation<'_>, writer: &FileWriter) -> Result<Vec<String>, SyncError> {
    let mut sources = Vec::with_capacity(2);
    if gen.settings.enable_tests {
        sources.push(gen.tests_path("requirements.txt"));
    }
    sources.push("requirements.txt".to_owned());

    let mut names: BTreeSet<String> = KNOWN_THIRD_PARTY.iter().map(|s| (*s).to_owned()).collect();
    if let Some(cfg) = writer.read(".isort.cfg")? {
        names.extend(listed_third_party(&cfg));
    }
    for rel in &sources {
        if let Some(text) = writer.read(rel)? {
            names.extend(parse_requirements(&text).iter().map(|req| import_style(&req.name)));
        }
    }

    let own_root = gen.settings.import_name.split('.').next().unwrap_or_default();
    names.remove(&import_style(own_root));
    Ok(names.into_iter().collect())
}

/// `.isort.cfg`. Registered to run after every other generator.
pub fn isort(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let third_party = known_third_party(gen, writer)?;
    let content = gen.render_with("isort.cfg.tera", |ctx| {
        ctx.insert("known_third_party", &third_party)
    })?;
    writer.write_clean(".isort.cfg", &content)?;
    Ok(vec![".isort.cfg".to_owned()])
}
