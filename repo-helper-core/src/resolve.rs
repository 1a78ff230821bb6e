//! Raw document -> [`Settings`].
//!
//! Resolution runs in three passes:
//!
//! 1. [`schema::check`] validates presence and fundamental types in table order.
//! 2. Base keys are read, defaults substituted, per-key constraints enforced.
//! 3. Derived keys are computed from the already-resolved base keys.
//!
//! Nothing here touches the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::schema;
use crate::settings::{Platform, PythonEnv, Settings, SphinxTheme};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*((a|b|rc)\d+)?(\.post\d+)?(\.dev\d+)?$")
        .expect("version regex is valid")
});

const DEFAULT_DEPLOY_VERSION: &str = "3.6";

/// `(license as written, trove classifier)`.
const LICENSE_CLASSIFIERS: &[(&str, &str)] = &[
    ("MIT", "License :: OSI Approved :: MIT License"),
    ("MIT License", "License :: OSI Approved :: MIT License"),
    ("Apache-2.0", "License :: OSI Approved :: Apache Software License"),
    ("Apache Software License", "License :: OSI Approved :: Apache Software License"),
    ("BSD-3-Clause", "License :: OSI Approved :: BSD License"),
    ("BSD", "License :: OSI Approved :: BSD License"),
    ("MPL-2.0", "License :: OSI Approved :: Mozilla Public License 2.0 (MPL 2.0)"),
    ("GPL-3.0-or-later", "License :: OSI Approved :: GNU General Public License v3 or later (GPLv3+)"),
    ("GPLv3+", "License :: OSI Approved :: GNU General Public License v3 or later (GPLv3+)"),
    (
        "LGPL-3.0-or-later",
        "License :: OSI Approved :: GNU Lesser General Public License v3 or later (LGPLv3+)",
    ),
    (
        "LGPLv3+",
        "License :: OSI Approved :: GNU Lesser General Public License v3 or later (LGPLv3+)",
    ),
];

/// Validates `raw` and produces the canonical settings.
pub fn resolve(raw: &Mapping) -> Result<Settings, ConfigError> {
    schema::check(raw)?;
    let doc = Doc(raw);

    // -----------------------------------------------------------------------
    // Base keys
    // -----------------------------------------------------------------------

    let author = doc.required("author")?;
    let modname = doc.required("modname")?;
    let short_desc = doc.required("short_desc")?;

    let version = doc.required("version")?;
    if !VERSION_RE.is_match(&version) {
        return Err(ConfigError::invalid(
            "version",
            format!("'{version}' is not a release version"),
        ));
    }

    let stubs_package = doc.flag("stubs_package", false);
    let import_name = normalise_import_name(&doc.text_or("import_name", &modname), stubs_package)?;

    let python_deploy_version = doc.text_or("python_deploy_version", DEFAULT_DEPLOY_VERSION);
    let mut python_versions = doc.list("python_versions");
    if python_versions.is_empty() {
        python_versions.push(python_deploy_version.clone());
    }

    let sphinx_html_theme = match doc.text("sphinx_html_theme") {
        None => SphinxTheme::default(),
        Some(name) => SphinxTheme::from_name(&name).ok_or_else(|| {
            ConfigError::invalid(
                "sphinx_html_theme",
                format!("unsupported theme '{name}'"),
            )
        })?,
    };

    let platforms = match doc.get("platforms") {
        None => Platform::ALL.to_vec(),
        Some(_) => parse_platforms(&doc.list("platforms"))?,
    };

    let enable_conda = doc.flag("enable_conda", false);
    let conda_channels = doc.list("conda_channels");
    if enable_conda && conda_channels.is_empty() {
        return Err(ConfigError::invalid(
            "conda_channels",
            "at least one channel is required when enable_conda is true",
        ));
    }

    let mut settings = Settings {
        email: doc.required("email")?,
        username: doc.required("username")?,
        copyright_years: doc.required("copyright_years")?,
        license: doc.required("license")?,
        repo_name: doc.text_or("repo_name", &modname),
        pypi_name: doc.text_or("pypi_name", &modname),
        import_name,
        classifiers: doc.list("classifiers"),
        keywords: doc.list("keywords"),
        source_dir: doc.text_or("source_dir", ""),
        pure_python: doc.flag("pure_python", true),
        on_pypi: doc.flag("on_pypi", true),
        stubs_package,

        enable_docs: doc.flag("enable_docs", false),
        enable_tests: doc.flag("enable_tests", false),
        enable_conda,
        enable_releases: doc.flag("enable_releases", false),
        enable_pre_commit: doc.flag("enable_pre_commit", false),

        docker_shields: doc.flag("docker_shields", false),
        docker_name: doc.text_or("docker_name", ""),

        python_deploy_version,
        python_versions,

        manifest_additional: doc.list("manifest_additional"),
        py_modules: doc.list("py_modules"),
        console_scripts: doc.list("console_scripts"),
        additional_setup_args: doc.str_map("additional_setup_args"),
        extras_require: doc.extras("extras_require"),
        additional_requirements_files: doc.list("additional_requirements_files"),
        setup_pre: doc.list("setup_pre"),
        platforms,
        use_experimental_backend: doc.flag("use_experimental_backend", false),

        rtfd_author: doc.text_or("rtfd_author", &author),
        preserve_custom_theme: doc.flag("preserve_custom_theme", false),
        sphinx_html_theme,
        extra_sphinx_extensions: doc.list("extra_sphinx_extensions"),
        intersphinx_mapping: doc.list("intersphinx_mapping"),
        sphinx_conf_preamble: doc.list("sphinx_conf_preamble"),
        sphinx_conf_epilogue: doc.list("sphinx_conf_epilogue"),
        html_theme_options: doc.json_map("html_theme_options")?,
        html_context: doc.json_map("html_context")?,
        docs_dir: doc.text_or("docs_dir", "doc-source"),

        tox_requirements: doc.list("tox_requirements"),
        tox_build_requirements: doc.list("tox_build_requirements"),
        tox_testenv_extras: doc.text_or("tox_testenv_extras", ""),
        tests_dir: doc.text_or("tests_dir", "tests"),
        mypy_deps: doc.list("mypy_deps"),
        mypy_plugins: doc.list("mypy_plugins"),
        mypy_version: doc.text_or("mypy_version", "0.790"),
        enable_devmode: doc.flag("enable_devmode", true),

        conda_channels,
        conda_description: doc.text_or("conda_description", &short_desc),

        additional_ignore: doc.list("additional_ignore"),
        yapf_exclude: doc.list("yapf_exclude"),
        imgbot_ignore: doc.list("imgbot_ignore"),
        pkginfo_extra: doc.list("pkginfo_extra"),
        exclude_files: doc.list("exclude_files"),

        package_dir: String::new(),
        min_py_version: String::new(),
        tox_py_versions: Vec::new(),
        gh_actions_versions: Vec::new(),

        extra: doc.unknown_keys()?,

        author,
        modname,
        version,
        short_desc,
    };

    derive(&mut settings);
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Derived keys
// ---------------------------------------------------------------------------

fn derive(s: &mut Settings) {
    if !s.source_dir.is_empty() && !s.source_dir.ends_with('/') {
        s.source_dir.push('/');
    }

    s.package_dir = format!("{}{}", s.source_dir, s.import_name.replace('.', "/"));

    let lowest = s
        .python_versions
        .iter()
        .filter_map(|v| cpython_version(v))
        .min();
    let deploy = cpython_version(&s.python_deploy_version);
    match lowest {
        Some((major, minor)) => {
            s.min_py_version = format!("{major}.{minor}");
            if deploy.is_some_and(|d| d < (major, minor)) {
                s.python_deploy_version = s.min_py_version.clone();
            }
        }
        None => s.min_py_version = s.python_deploy_version.clone(),
    }

    s.tox_py_versions = s.python_versions.iter().map(|v| tox_env(v)).collect();
    s.gh_actions_versions = s
        .python_versions
        .iter()
        .zip(&s.tox_py_versions)
        .map(|(python, env)| PythonEnv {
            python: python.clone(),
            envs: format!("{env}, build"),
        })
        .collect();

    s.classifiers = classifiers(s);

    if !s.extras_require.is_empty() && !s.extras_require.contains_key("all") {
        let all: BTreeSet<String> = s.extras_require.values().flatten().cloned().collect();
        s.extras_require.insert("all".to_owned(), all.into_iter().collect());
    }
}

/// `(major, minor)` for a CPython version string such as `3.8` or `3.9-dev`.
///
/// Returns `None` for other implementations (`pypy3`).
fn cpython_version(version: &str) -> Option<(u32, u32)> {
    let release = version.split('-').next()?;
    let mut parts = release.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

/// tox environment name for an interpreter version.
fn tox_env(version: &str) -> String {
    if version.starts_with("py") {
        version.to_owned()
    } else {
        format!("py{}", version.replace('.', ""))
    }
}

fn classifiers(s: &Settings) -> Vec<String> {
    let mut out: BTreeSet<String> = s.classifiers.iter().cloned().collect();

    if let Some((_, trove)) = LICENSE_CLASSIFIERS.iter().find(|(name, _)| *name == s.license) {
        out.insert((*trove).to_owned());
    }

    let mut cpython = false;
    let mut only_py3 = true;
    for version in &s.python_versions {
        if version.starts_with("pypy") {
            out.insert("Programming Language :: Python :: Implementation :: PyPy".to_owned());
            continue;
        }
        let Some((major, minor)) = cpython_version(version) else {
            continue;
        };
        cpython = true;
        only_py3 &= major == 3;
        if !version.contains('-') {
            out.insert(format!("Programming Language :: Python :: {major}.{minor}"));
        }
    }
    if cpython {
        out.insert("Programming Language :: Python :: Implementation :: CPython".to_owned());
        if only_py3 {
            out.insert("Programming Language :: Python :: 3 :: Only".to_owned());
        }
    }

    if Platform::ALL.iter().all(|p| s.supports(*p)) {
        out.insert("Operating System :: OS Independent".to_owned());
    } else {
        out.extend(s.platforms.iter().map(|p| p.classifier().to_owned()));
    }

    out.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Per-key constraints
// ---------------------------------------------------------------------------

fn normalise_import_name(name: &str, stubs_package: bool) -> Result<String, ConfigError> {
    if stubs_package {
        return Ok(name.strip_suffix("-stubs").unwrap_or(name).to_owned());
    }

    let name = name.replace('-', "_").replace('/', ".");
    for part in name.split('.') {
        if !is_identifier(part) {
            return Err(ConfigError::invalid(
                "import_name",
                format!("'{part}' is not a valid Python identifier"),
            ));
        }
    }
    Ok(name)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn parse_platforms(names: &[String]) -> Result<Vec<Platform>, ConfigError> {
    let mut platforms = names
        .iter()
        .map(|name| {
            Platform::from_name(name).ok_or_else(|| {
                ConfigError::invalid(
                    "platforms",
                    format!("unknown platform '{name}' (expected Windows, macOS or Linux)"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    platforms.sort();
    platforms.dedup();
    Ok(platforms)
}

// ---------------------------------------------------------------------------
// Typed access to the raw mapping
// ---------------------------------------------------------------------------

/// Read-only view over a type-checked document. `null` reads as absent.
struct Doc<'a>(&'a Mapping);

impl Doc<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.text(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_owned(),
        })
    }

    fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_owned())
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_sequence)
            .map(|seq| seq.iter().filter_map(scalar_text).collect())
            .unwrap_or_default()
    }

    fn str_map(&self, key: &str) -> BTreeMap<String, String> {
        self.get(key)
            .and_then(Value::as_mapping)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_owned(), v.as_str()?.to_owned())))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn extras(&self, key: &str) -> BTreeMap<String, Vec<String>> {
        let Some(map) = self.get(key).and_then(Value::as_mapping) else {
            return BTreeMap::new();
        };
        map.iter()
            .filter_map(|(k, v)| {
                let requirements = match v {
                    Value::String(single) => vec![single.clone()],
                    Value::Sequence(seq) => seq.iter().filter_map(scalar_text).collect(),
                    _ => return None,
                };
                Some((k.as_str()?.to_owned(), requirements))
            })
            .collect()
    }

    fn json_map(&self, key: &str) -> Result<Map<String, JsonValue>, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(Map::new());
        };
        match serde_json::to_value(value) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(_) => Err(ConfigError::WrongType {
                key: key.to_owned(),
                expected: "a mapping",
                found: schema::type_name(value),
            }),
            Err(e) => Err(ConfigError::invalid(key, e.to_string())),
        }
    }

    /// Every key not in the schema, converted to JSON for the template context.
    fn unknown_keys(&self) -> Result<BTreeMap<String, JsonValue>, ConfigError> {
        let mut extra = BTreeMap::new();
        for (key, value) in self.0 {
            let Some(name) = key.as_str() else {
                return Err(ConfigError::invalid(
                    "<document>",
                    format!("setting names must be strings, found {}", schema::type_name(key)),
                ));
            };
            if schema::lookup(name).is_some() || schema::DERIVED_KEYS.contains(&name) {
                continue;
            }
            let value = serde_json::to_value(value)
                .map_err(|e| ConfigError::invalid(name, e.to_string()))?;
            extra.insert(name.to_owned(), value);
        }
        Ok(extra)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
