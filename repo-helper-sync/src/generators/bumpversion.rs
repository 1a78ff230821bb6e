//! `.bumpversion.cfg`, merged incrementally so user-added sections survive.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use repo_helper_core::SETTINGS_FILE;

use crate::error::SyncError;
use crate::writer::{append_missing_blocks, FileWriter};

use super::Generation;

const BUMPVERSION_CFG: &str = ".bumpversion.cfg";

static CURRENT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^current_version\s*=.*$").expect("current_version regex is valid")
});

fn preamble(version: &str) -> String {
    format!("[bumpversion]\ncurrent_version = {version}\ncommit = True\ntag = True\n\n")
}

/// One `[bumpversion:file:...]` section per file that carries the version.
fn required_blocks(gen: &Generation<'_>) -> Vec<String> {
    let settings = gen.settings;
    let mut files = vec![
        SETTINGS_FILE.to_owned(),
        "__pkginfo__.py".to_owned(),
        "README.rst".to_owned(),
    ];
    if settings.enable_docs {
        files.push(gen.docs_path("index.rst"));
    }
    if !settings.py_modules.is_empty() {
        files.extend(
            settings
                .py_modules
                .iter()
                .map(|module| format!("{}{module}.py", settings.source_dir)),
        );
    } else if !settings.stubs_package {
        files.push(format!("{}/__init__.py", settings.package_dir));
    }

    files
        .into_iter()
        .map(|file| format!("[bumpversion:file:{file}]"))
        .collect()
}

pub fn bumpversion(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let existing = writer.read(BUMPVERSION_CFG)?;
    let merged = append_missing_blocks(
        existing.as_deref(),
        &preamble(&gen.settings.version),
        &required_blocks(gen),
    );
    let current = format!("current_version = {}", gen.settings.version);
    let content = CURRENT_VERSION_RE.replace(&merged, NoExpand(&current));
    writer.write_exact(BUMPVERSION_CFG, &content)?;
    Ok(vec![BUMPVERSION_CFG.to_owned()])
}
