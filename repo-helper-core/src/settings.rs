//! Canonical, fully-defaulted settings.
//!
//! [`Settings`] is produced once per run by [`crate::resolve::resolve`] and is
//! read-only afterwards. Generators read typed fields; nothing downstream
//! looks settings up by string key except templates.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Names accepted for `sphinx_html_theme`, in [`SphinxTheme`] order.
pub const THEME_NAMES: &[&str] = &[
    "sphinx_rtd_theme",
    "alabaster",
    "repo_helper_sphinx_theme",
    "domdf_sphinx_theme",
];

/// Names accepted in `platforms`, in [`Platform`] order.
pub const PLATFORM_NAMES: &[&str] = &["Windows", "macOS", "Linux"];

/// Sphinx HTML theme used for the documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SphinxTheme {
    SphinxRtdTheme,
    Alabaster,
    RepoHelperSphinxTheme,
    #[default]
    DomdfSphinxTheme,
}

impl SphinxTheme {
    const ALL: [SphinxTheme; 4] = [
        SphinxTheme::SphinxRtdTheme,
        SphinxTheme::Alabaster,
        SphinxTheme::RepoHelperSphinxTheme,
        SphinxTheme::DomdfSphinxTheme,
    ];

    pub fn as_str(self) -> &'static str {
        THEME_NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.as_str() == name)
    }

    /// The pip requirement that provides this theme.
    pub fn requirement(self) -> &'static str {
        match self {
            SphinxTheme::SphinxRtdTheme => "sphinx_rtd_theme>=0.5.0",
            SphinxTheme::Alabaster => "alabaster>=0.7.12",
            SphinxTheme::RepoHelperSphinxTheme => "repo_helper_sphinx_theme>=0.0.2",
            SphinxTheme::DomdfSphinxTheme => "domdf_sphinx_theme>=0.1.0",
        }
    }
}

impl fmt::Display for SphinxTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system the package supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Platform {
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOs, Platform::Linux];

    pub fn as_str(self) -> &'static str {
        PLATFORM_NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Trove classifier for this platform alone.
    pub fn classifier(self) -> &'static str {
        match self {
            Platform::Windows => "Operating System :: Microsoft :: Windows",
            Platform::MacOs => "Operating System :: MacOS",
            Platform::Linux => "Operating System :: POSIX :: Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean settings that gate whole groups of generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    EnableDocs,
    EnableTests,
    EnableConda,
    EnableReleases,
    EnablePreCommit,
}

impl FeatureFlag {
    /// The settings key backing this flag.
    pub fn key(self) -> &'static str {
        match self {
            FeatureFlag::EnableDocs => "enable_docs",
            FeatureFlag::EnableTests => "enable_tests",
            FeatureFlag::EnableConda => "enable_conda",
            FeatureFlag::EnableReleases => "enable_releases",
            FeatureFlag::EnablePreCommit => "enable_pre_commit",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One GitHub Actions matrix entry: the interpreter and the tox envs it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PythonEnv {
    pub python: String,
    pub envs: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Resolved `repo_helper.yml`.
///
/// Every recognised key is present. Serialises flat (pass-through keys
/// alongside recognised ones) to build the template context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    // metadata
    pub author: String,
    pub email: String,
    pub username: String,
    pub modname: String,
    pub copyright_years: String,
    pub version: String,
    pub license: String,
    pub short_desc: String,
    pub repo_name: String,
    pub pypi_name: String,
    pub import_name: String,
    pub classifiers: Vec<String>,
    pub keywords: Vec<String>,
    pub source_dir: String,
    pub pure_python: bool,
    pub on_pypi: bool,
    pub stubs_package: bool,

    // feature flags
    pub enable_docs: bool,
    pub enable_tests: bool,
    pub enable_conda: bool,
    pub enable_releases: bool,
    pub enable_pre_commit: bool,

    pub docker_shields: bool,
    pub docker_name: String,

    pub python_deploy_version: String,
    pub python_versions: Vec<String>,

    // packaging
    pub manifest_additional: Vec<String>,
    pub py_modules: Vec<String>,
    pub console_scripts: Vec<String>,
    pub additional_setup_args: BTreeMap<String, String>,
    pub extras_require: BTreeMap<String, Vec<String>>,
    pub additional_requirements_files: Vec<String>,
    pub setup_pre: Vec<String>,
    pub platforms: Vec<Platform>,
    pub use_experimental_backend: bool,

    // documentation
    pub rtfd_author: String,
    pub preserve_custom_theme: bool,
    pub sphinx_html_theme: SphinxTheme,
    pub extra_sphinx_extensions: Vec<String>,
    pub intersphinx_mapping: Vec<String>,
    pub sphinx_conf_preamble: Vec<String>,
    pub sphinx_conf_epilogue: Vec<String>,
    pub html_theme_options: Map<String, Value>,
    pub html_context: Map<String, Value>,
    pub docs_dir: String,

    // testing
    pub tox_requirements: Vec<String>,
    pub tox_build_requirements: Vec<String>,
    pub tox_testenv_extras: String,
    pub tests_dir: String,
    pub mypy_deps: Vec<String>,
    pub mypy_plugins: Vec<String>,
    pub mypy_version: String,
    pub enable_devmode: bool,

    // conda
    pub conda_channels: Vec<String>,
    pub conda_description: String,

    // housekeeping
    pub additional_ignore: Vec<String>,
    pub yapf_exclude: Vec<String>,
    pub imgbot_ignore: Vec<String>,
    pub pkginfo_extra: Vec<String>,
    pub exclude_files: Vec<String>,

    // derived
    pub package_dir: String,
    pub min_py_version: String,
    pub tox_py_versions: Vec<String>,
    pub gh_actions_versions: Vec<PythonEnv>,

    /// Keys not in the schema, untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    pub fn flag(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::EnableDocs => self.enable_docs,
            FeatureFlag::EnableTests => self.enable_tests,
            FeatureFlag::EnableConda => self.enable_conda,
            FeatureFlag::EnableReleases => self.enable_releases,
            FeatureFlag::EnablePreCommit => self.enable_pre_commit,
        }
    }

    /// Whether `name` appears in `exclude_files`.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_files.iter().any(|excluded| excluded == name)
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
