//! Tera rendering engine for the managed-file templates.
//!
//! Undefined variables are hard errors (tera's default); autoescaping is off
//! because nothing rendered here is HTML-escaped output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::error::RenderError;
use crate::helpers;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    // README / docs index blocks
    ("blocks/shields.rst.tera", include_str!("templates/blocks/shields.rst.tera")),
    ("blocks/short_desc.rst.tera", include_str!("templates/blocks/short_desc.rst.tera")),
    (
        "blocks/readme_installation.rst.tera",
        include_str!("templates/blocks/readme_installation.rst.tera"),
    ),
    (
        "blocks/docs_installation.rst.tera",
        include_str!("templates/blocks/docs_installation.rst.tera"),
    ),
    ("blocks/docs_links.rst.tera", include_str!("templates/blocks/docs_links.rst.tera")),
    ("readme.rst.tera", include_str!("templates/readme.rst.tera")),
    ("docs/index.rst.tera", include_str!("templates/docs/index.rst.tera")),
    // bots
    ("lint_roller.sh.tera", include_str!("templates/lint_roller.sh.tera")),
    ("github/stale.yml.tera", include_str!("templates/github/stale.yml.tera")),
    ("github/auto_assign.yml.tera", include_str!("templates/github/auto_assign.yml.tera")),
    ("github/assign.yml.tera", include_str!("templates/github/assign.yml.tera")),
    ("dependabot.yml.tera", include_str!("templates/dependabot.yml.tera")),
    ("imgbotconfig.tera", include_str!("templates/imgbotconfig.tera")),
    // packaging
    ("manifest.in.tera", include_str!("templates/manifest.in.tera")),
    ("setup.py.tera", include_str!("templates/setup.py.tera")),
    ("setup.cfg.tera", include_str!("templates/setup.cfg.tera")),
    ("pkginfo.py.tera", include_str!("templates/pkginfo.py.tera")),
    ("pyproject.toml.tera", include_str!("templates/pyproject.toml.tera")),
    ("gitignore.tera", include_str!("templates/gitignore.tera")),
    // docs
    ("docs/conf.py.tera", include_str!("templates/docs/conf.py.tera")),
    ("docs/readthedocs.yml.tera", include_str!("templates/docs/readthedocs.yml.tera")),
    ("docs/docutils.conf.tera", include_str!("templates/docs/docutils.conf.tera")),
    ("docs/404.rst.tera", include_str!("templates/docs/404.rst.tera")),
    ("docs/source.rst.tera", include_str!("templates/docs/source.rst.tera")),
    ("docs/building.rst.tera", include_str!("templates/docs/building.rst.tera")),
    ("docs/style.css.tera", include_str!("templates/docs/style.css.tera")),
    ("docs/layout.html.tera", include_str!("templates/docs/layout.html.tera")),
    // ci / cd
    ("github/python_ci.yml.tera", include_str!("templates/github/python_ci.yml.tera")),
    ("github/docs_test_action.yml.tera", include_str!("templates/github/docs_test_action.yml.tera")),
    ("github/octocheese.yml.tera", include_str!("templates/github/octocheese.yml.tera")),
    ("github/manylinux_build.yml.tera", include_str!("templates/github/manylinux_build.yml.tera")),
    ("make_conda_recipe.py.tera", include_str!("templates/make_conda_recipe.py.tera")),
    ("travis.yml.tera", include_str!("templates/travis.yml.tera")),
    ("travis_deploy_conda.sh.tera", include_str!("templates/travis_deploy_conda.sh.tera")),
    // testing / linting
    ("tox.ini.tera", include_str!("templates/tox.ini.tera")),
    ("style.yapf.tera", include_str!("templates/style.yapf.tera")),
    ("pylintrc.tera", include_str!("templates/pylintrc.tera")),
    ("pre_commit_config.yaml.tera", include_str!("templates/pre_commit_config.yaml.tera")),
    ("isort.cfg.tera", include_str!("templates/isort.cfg.tera")),
    // contributing
    ("github/bug_report.md.tera", include_str!("templates/github/bug_report.md.tera")),
    ("github/feature_request.md.tera", include_str!("templates/github/feature_request.md.tera")),
    ("contributing.rst.tera", include_str!("templates/contributing.rst.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// `.tera` files under `dir`, named by their path relative to `dir`.
fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    files.sort();

    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: BTreeMap<String, String> = TPLS
        .iter()
        .map(|(name, content)| ((*name).to_owned(), (*content).to_owned()))
        .collect();
    if let Some(dir) = user_template_dir {
        templates.extend(load_user_templates(dir)?);
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    helpers::register(&mut tera);
    tera.add_raw_templates(templates).map_err(RenderError::Load)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine over the embedded templates, with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that replace embedded ones of
/// the same relative name (`docs/conf.py.tera`) or add new ones.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render `name` with `ctx`.
    ///
    /// Fails with [`RenderError::Template`] when the template does not exist
    /// or references a variable missing from `ctx`.
    pub fn render(&self, name: &str, ctx: &tera::Context) -> Result<String, RenderError> {
        self.tera
            .render(name, ctx)
            .map_err(|source| RenderError::Template { name: name.to_owned(), source })
    }

    /// Names of every loaded template, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

/// Names of the embedded templates, in declaration order.
pub fn embedded_template_names() -> impl Iterator<Item = &'static str> {
    TPLS.iter().map(|(name, _)| *name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
