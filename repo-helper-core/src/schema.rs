//! The table of recognised `repo_helper.yml` keys.
//!
//! [`SCHEMA`] is the single source of truth for which keys exist, which are
//! required, and what fundamental type each one holds. The resolver walks it
//! in order before building [`Settings`](crate::settings::Settings), so the
//! first offending key reported for a bad document is always the same one.

use serde_json::{json, Map, Value as JsonValue};
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::settings::{PLATFORM_NAMES, THEME_NAMES};

// ---------------------------------------------------------------------------
// Key kinds
// ---------------------------------------------------------------------------

/// Fundamental type of a settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Str,
    Bool,
    /// A string, or a number that is read back as its decimal text (`3.6`).
    StrOrNumber,
    StrList,
    /// A list whose entries are strings or numbers (`python_versions`).
    VersionList,
    /// Mapping of string to string.
    StrMap,
    /// Mapping of string to a string or a list of strings.
    ExtrasMap,
    /// Mapping of string to anything; values are passed through to templates.
    AnyMap,
    /// One of a fixed set of names.
    Choice(&'static [&'static str]),
    /// A list drawn from a fixed set of names.
    ChoiceList(&'static [&'static str]),
}

impl KeyKind {
    fn expected(self) -> &'static str {
        match self {
            KeyKind::Str | KeyKind::Choice(_) => "a string",
            KeyKind::Bool => "a boolean",
            KeyKind::StrOrNumber => "a string or a number",
            KeyKind::StrList | KeyKind::ChoiceList(_) => "a list of strings",
            KeyKind::VersionList => "a list of versions",
            KeyKind::StrMap => "a mapping of strings",
            KeyKind::ExtrasMap => "a mapping of strings or lists of strings",
            KeyKind::AnyMap => "a mapping",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            KeyKind::Str | KeyKind::Choice(_) => value.is_string(),
            KeyKind::Bool => value.is_bool(),
            KeyKind::StrOrNumber => is_scalar_text(value),
            KeyKind::StrList | KeyKind::ChoiceList(_) => {
                list_of(value, |v| v.is_string())
            }
            KeyKind::VersionList => list_of(value, is_scalar_text),
            KeyKind::StrMap => map_of(value, |v| v.is_string()),
            KeyKind::ExtrasMap => map_of(value, |v| v.is_string() || list_of(v, |i| i.is_string())),
            KeyKind::AnyMap => value.is_mapping(),
        }
    }

    fn json_schema(self) -> JsonValue {
        match self {
            KeyKind::Str => json!({ "type": "string" }),
            KeyKind::Bool => json!({ "type": "boolean" }),
            KeyKind::StrOrNumber => json!({ "type": ["string", "number"] }),
            KeyKind::StrList => json!({ "type": "array", "items": { "type": "string" } }),
            KeyKind::VersionList => {
                json!({ "type": "array", "items": { "type": ["string", "number"] } })
            }
            KeyKind::StrMap => {
                json!({ "type": "object", "additionalProperties": { "type": "string" } })
            }
            KeyKind::ExtrasMap => json!({
                "type": "object",
                "additionalProperties": {
                    "anyOf": [
                        { "type": "string" },
                        { "type": "array", "items": { "type": "string" } }
                    ]
                }
            }),
            KeyKind::AnyMap => json!({ "type": "object" }),
            KeyKind::Choice(names) => json!({ "type": "string", "enum": names }),
            KeyKind::ChoiceList(names) => {
                json!({ "type": "array", "items": { "type": "string", "enum": names } })
            }
        }
    }
}

fn is_scalar_text(value: &Value) -> bool {
    value.is_string() || value.is_number()
}

fn list_of(value: &Value, item: impl Fn(&Value) -> bool) -> bool {
    value.as_sequence().is_some_and(|seq| seq.iter().all(item))
}

fn map_of(value: &Value, item: impl Fn(&Value) -> bool) -> bool {
    value
        .as_mapping()
        .is_some_and(|map| map.iter().all(|(k, v)| k.is_string() && item(v)))
}

/// Human-readable name of a YAML value's type, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

/// One recognised key.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub name: &'static str,
    pub kind: KeyKind,
    pub required: bool,
}

const fn req(name: &'static str, kind: KeyKind) -> KeySpec {
    KeySpec { name, kind, required: true }
}

const fn opt(name: &'static str, kind: KeyKind) -> KeySpec {
    KeySpec { name, kind, required: false }
}

use KeyKind::*;

/// Every recognised key, in resolution order.
pub const SCHEMA: &[KeySpec] = &[
    // metadata
    req("author", Str),
    req("email", Str),
    req("username", Str),
    req("modname", Str),
    req("copyright_years", StrOrNumber),
    req("version", StrOrNumber),
    req("license", Str),
    req("short_desc", Str),
    opt("repo_name", Str),
    opt("pypi_name", Str),
    opt("import_name", Str),
    opt("classifiers", StrList),
    opt("keywords", StrList),
    opt("source_dir", Str),
    opt("pure_python", Bool),
    opt("on_pypi", Bool),
    opt("stubs_package", Bool),
    // feature flags
    opt("enable_docs", Bool),
    opt("enable_tests", Bool),
    opt("enable_conda", Bool),
    opt("enable_releases", Bool),
    opt("enable_pre_commit", Bool),
    // shields
    opt("docker_shields", Bool),
    opt("docker_name", Str),
    // python versions
    opt("python_deploy_version", StrOrNumber),
    opt("python_versions", VersionList),
    // packaging
    opt("manifest_additional", StrList),
    opt("py_modules", StrList),
    opt("console_scripts", StrList),
    opt("additional_setup_args", StrMap),
    opt("extras_require", ExtrasMap),
    opt("additional_requirements_files", StrList),
    opt("setup_pre", StrList),
    opt("platforms", ChoiceList(PLATFORM_NAMES)),
    opt("use_experimental_backend", Bool),
    // documentation
    opt("rtfd_author", Str),
    opt("preserve_custom_theme", Bool),
    opt("sphinx_html_theme", Choice(THEME_NAMES)),
    opt("extra_sphinx_extensions", StrList),
    opt("intersphinx_mapping", StrList),
    opt("sphinx_conf_preamble", StrList),
    opt("sphinx_conf_epilogue", StrList),
    opt("html_theme_options", AnyMap),
    opt("html_context", AnyMap),
    opt("docs_dir", Str),
    // testing
    opt("tox_requirements", StrList),
    opt("tox_build_requirements", StrList),
    opt("tox_testenv_extras", Str),
    opt("tests_dir", Str),
    opt("mypy_deps", StrList),
    opt("mypy_plugins", StrList),
    opt("mypy_version", Str),
    opt("enable_devmode", Bool),
    // conda
    opt("conda_channels", StrList),
    opt("conda_description", Str),
    // housekeeping
    opt("additional_ignore", StrList),
    opt("yapf_exclude", StrList),
    opt("imgbot_ignore", StrList),
    opt("pkginfo_extra", StrList),
    opt("exclude_files", StrList),
];

/// Keys the resolver computes itself. A document may not set them; a
/// pass-through key with one of these names is dropped.
pub const DERIVED_KEYS: &[&str] =
    &["package_dir", "min_py_version", "tox_py_versions", "gh_actions_versions"];

/// Looks up a key in [`SCHEMA`].
pub fn lookup(name: &str) -> Option<&'static KeySpec> {
    SCHEMA.iter().find(|spec| spec.name == name)
}

/// Checks presence of required keys and the fundamental type of every
/// recognised key, in table order.
///
/// A `null` value counts as absent.
pub fn check(raw: &Mapping) -> Result<(), ConfigError> {
    for spec in SCHEMA {
        match raw.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ConfigError::Missing {
                        key: spec.name.to_owned(),
                    });
                }
            }
            Some(value) if !spec.kind.accepts(value) => {
                return Err(ConfigError::WrongType {
                    key: spec.name.to_owned(),
                    expected: spec.kind.expected(),
                    found: type_name(value),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// JSON schema describing the settings document.
///
/// Unknown keys are allowed (`additionalProperties: true`).
pub fn json_schema() -> JsonValue {
    let mut properties = Map::new();
    for spec in SCHEMA {
        properties.insert(spec.name.to_owned(), spec.kind.json_schema());
    }
    let required: Vec<&str> = SCHEMA
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name)
        .collect();

    json!({
        "$schema": "http://json-schema.org/schema#",
        "title": "repo_helper.yml",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": true,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
