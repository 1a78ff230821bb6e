//! `requirements.txt` handling for the ensured-requirements generators.

use std::collections::BTreeMap;

/// One `name[extras]<specifier>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Project name as written.
    pub name: String,
    /// The whole line, trimmed.
    pub line: String,
}

impl Requirement {
    /// Parses a requirement line; `None` for comments, options (`-r x`),
    /// URLs and blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let end = line
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
            .unwrap_or(line.len());
        let name = &line[..end];
        if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return None;
        }
        let rest = line[end..].trim_start();
        let well_formed = rest.is_empty()
            || rest.starts_with(['[', '<', '>', '=', '!', '~', ';']);
        well_formed.then(|| Requirement {
            name: name.to_owned(),
            line: line.to_owned(),
        })
    }

    /// PEP 503 normalised name: lowercase, runs of `-_.` become `-`.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Requirements parsed from file text; other lines are skipped.
pub fn parse_requirements(text: &str) -> Vec<Requirement> {
    text.lines().filter_map(Requirement::parse).collect()
}

/// Adds each default whose name is absent from `existing`.
///
/// Existing entries keep their pins. Comments and option lines go first in
/// their original order, then requirements sorted case-insensitively by name.
pub fn ensure_requirements(existing: Option<&str>, defaults: &[&str]) -> String {
    let mut header = Vec::new();
    let mut by_key: BTreeMap<String, Requirement> = BTreeMap::new();

    for raw in existing.unwrap_or_default().lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match Requirement::parse(line) {
            Some(req) => {
                by_key.entry(req.key()).or_insert(req);
            }
            None => {
                if !line.starts_with('#') && !line.starts_with('-') {
                    tracing::warn!("keeping unrecognised requirement line: {line}");
                }
                header.push(line.to_owned());
            }
        }
    }

    for default in defaults {
        if let Some(req) = Requirement::parse(default) {
            by_key.entry(req.key()).or_insert(req);
        }
    }

    let mut out: Vec<String> = header;
    out.extend(by_key.into_values().map(|req| req.line));
    let mut text = out.join("\n");
    text.push('\n');
    text
}
