//! Marker-delimited regions in reStructuredText files.
//!
//! A region runs from a `.. start <name>` line to the matching
//! `.. end <name>` line. Rewriting replaces the whole region; text outside
//! it is never touched, and a file without the markers is left as it is.

use regex::{NoExpand, Regex};

fn block_regex(name: &str) -> Regex {
    let name = regex::escape(name);
    Regex::new(&format!(r"(?s)\.\. start {name}\b.*?\.\. end {name}\b"))
        .expect("escaped block name forms a valid pattern")
}

/// Replaces the first `name` region of `text` with `rendered`.
///
/// `rendered` should itself start and end with the markers so that the
/// rewrite can be repeated.
pub fn replace_block(text: &str, name: &str, rendered: &str) -> String {
    block_regex(name)
        .replace(text, NoExpand(rendered.trim_end()))
        .into_owned()
}

/// Whether `text` contains a complete `name` region.
pub fn has_block(text: &str, name: &str) -> bool {
    block_regex(name).is_match(text)
}
