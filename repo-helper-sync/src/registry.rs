//! Ordered catalogue of generators.
//!
//! Each [`GeneratorEntry`] names the exclusion identifier a user puts in
//! `exclude_files` to suppress it, and the feature flags that must all be
//! enabled for it to run. At most one entry may be marked
//! [`Position::Last`]; [`Registry::new`] moves it to the end and rejects a
//! second claimant.

use std::fmt;

use thiserror::Error;

use repo_helper_core::{FeatureFlag, Settings};

use crate::error::SyncError;
use crate::generators::Generation;
use crate::writer::FileWriter;

/// A generator writes its files through the writer and returns the
/// repository-relative paths it manages.
pub type GeneratorFn = fn(&Generation<'_>, &mut FileWriter) -> Result<Vec<String>, SyncError>;

/// Where an entry runs relative to the rest of the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Registry order.
    Ordered,
    /// After every other entry, regardless of where it is declared.
    Last,
}

#[derive(Clone, Copy)]
pub struct GeneratorEntry {
    pub name: &'static str,
    pub requires: &'static [FeatureFlag],
    pub position: Position,
    pub generate: GeneratorFn,
}

impl GeneratorEntry {
    pub const fn new(
        name: &'static str,
        requires: &'static [FeatureFlag],
        generate: GeneratorFn,
    ) -> Self {
        GeneratorEntry {
            name,
            requires,
            position: Position::Ordered,
            generate,
        }
    }

    pub const fn last(mut self) -> Self {
        self.position = Position::Last;
        self
    }

    /// Whether this entry runs for `settings`, and if not, why.
    pub fn decide(&self, settings: &Settings) -> Decision {
        if settings.is_excluded(self.name) {
            return Decision::Excluded;
        }
        match self.requires.iter().find(|flag| !settings.flag(**flag)) {
            Some(flag) => Decision::FlagDisabled(*flag),
            None => Decision::Run,
        }
    }
}

impl fmt::Debug for GeneratorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorEntry")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("position", &self.position)
            .finish()
    }
}

/// Gating outcome for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Run,
    /// The entry's name is in `exclude_files`.
    Excluded,
    /// A required flag is false (the first one found).
    FlagDisabled(FeatureFlag),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Run => write!(f, "run"),
            Decision::Excluded => write!(f, "excluded"),
            Decision::FlagDisabled(flag) => write!(f, "{flag} is false"),
        }
    }
}

/// Catalogue validation failures, raised when the registry is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("generators '{first}' and '{second}' both claim to run last")]
    MultipleLast {
        first: &'static str,
        second: &'static str,
    },
}

/// Validated, ordered generator catalogue.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<GeneratorEntry>,
}

impl Registry {
    /// Validates `entries` and moves the runs-last entry (if any) to the end.
    pub fn new(entries: Vec<GeneratorEntry>) -> Result<Self, RegistryError> {
        let mut last: Option<GeneratorEntry> = None;
        let mut ordered = Vec::with_capacity(entries.len());
        for entry in entries {
            match (entry.position, last) {
                (Position::Ordered, _) => ordered.push(entry),
                (Position::Last, None) => last = Some(entry),
                (Position::Last, Some(first)) => {
                    return Err(RegistryError::MultipleLast {
                        first: first.name,
                        second: entry.name,
                    });
                }
            }
        }
        ordered.extend(last);
        Ok(Registry { entries: ordered })
    }

    /// The built-in catalogue.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(crate::generators::builtin_entries())
    }

    pub fn entries(&self) -> &[GeneratorEntry] {
        &self.entries
    }

    /// Every entry with its gating decision for `settings`, in run order.
    pub fn plan<'r>(&'r self, settings: &Settings) -> Vec<(&'r GeneratorEntry, Decision)> {
        self.entries
            .iter()
            .map(|entry| (entry, entry.decide(settings)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use repo_helper_core::FeatureFlag::{EnableDocs, EnableTests};

    use super::*;
    use crate::generators::test_support::settings;

    fn noop(_: &Generation<'_>, _: &mut FileWriter) -> Result<Vec<String>, SyncError> {
        Ok(vec![])
    }

    const DOCS_AND_TESTS: GeneratorEntry =
        GeneratorEntry::new("docs_tests", &[EnableDocs, EnableTests], noop);

    #[test]
    fn every_required_flag_must_be_true() {
        let docs_only = settings("enable_docs: true\nenable_tests: false\n");
        assert_eq!(DOCS_AND_TESTS.decide(&docs_only), Decision::FlagDisabled(EnableTests));

        let tests_only = settings("enable_docs: false\nenable_tests: true\n");
        assert_eq!(DOCS_AND_TESTS.decide(&tests_only), Decision::FlagDisabled(EnableDocs));

        let neither = settings("enable_docs: false\nenable_tests: false\n");
        assert_eq!(DOCS_AND_TESTS.decide(&neither), Decision::FlagDisabled(EnableDocs));

        let both = settings("enable_docs: true\nenable_tests: true\n");
        assert_eq!(DOCS_AND_TESTS.decide(&both), Decision::Run);
    }

    #[test]
    fn exclusion_is_checked_before_flags() {
        let excluded = settings("enable_docs: true\nenable_tests: true\nexclude_files: [docs_tests]\n");
        assert_eq!(DOCS_AND_TESTS.decide(&excluded), Decision::Excluded);

        let excluded_and_off = settings("enable_docs: false\nexclude_files: [docs_tests]\n");
        assert_eq!(DOCS_AND_TESTS.decide(&excluded_and_off), Decision::Excluded);
    }

    #[test]
    fn last_entry_is_moved_to_the_end() {
        let registry = Registry::new(vec![
            GeneratorEntry::new("a", &[], noop),
            GeneratorEntry::new("sorter", &[], noop).last(),
            GeneratorEntry::new("b", &[], noop),
        ])
        .expect("valid registry");
        let names: Vec<_> = registry.entries().iter().map(|e| e.name).collect();
        assert_eq!(names, ["a", "b", "sorter"]);
    }

    #[test]
    fn two_last_entries_are_rejected() {
        let err = Registry::new(vec![
            GeneratorEntry::new("x", &[], noop).last(),
            GeneratorEntry::new("y", &[], noop).last(),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::MultipleLast { first: "x", second: "y" });
    }

    #[test]
    fn builtin_registry_is_valid_and_ends_with_isort() {
        let registry = Registry::builtin().expect("builtin registry");
        let last = registry.entries().last().expect("non-empty");
        assert_eq!(last.name, "isort");
        assert_eq!(last.position, Position::Last);
        let lasts = registry
            .entries()
            .iter()
            .filter(|e| e.position == Position::Last)
            .count();
        assert_eq!(lasts, 1);
    }
}
