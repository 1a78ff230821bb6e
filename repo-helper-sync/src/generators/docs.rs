//! Sphinx documentation tree.

use serde_json::{json, Map, Value};

use repo_helper_core::{Settings, SphinxTheme};
use repo_helper_renderer::fill_absent;

use crate::error::SyncError;
use crate::requirements::ensure_requirements;
use crate::writer::FileWriter;

use super::{write_template, Generation};

const DOC_REQUIREMENTS: &[&str] = &[
    "sphinx>=3.0.3",
    "sphinxcontrib-httpdomain>=1.7.0",
    "sphinxemoji>=0.1.6",
    "sphinx-notfound-page",
    "sphinx-tabs>=1.1.13",
    "sphinx-autodoc-typehints>=1.11.0",
    "sphinx-prompt>=1.2.0",
];

/// Theme stylesheet and layout override. Runs ahead of the registry when
/// docs are enabled and the user has not asked to keep a custom theme.
pub fn copy_docs_styling(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    Ok(vec![
        write_template(gen, writer, "docs/style.css.tera", &gen.docs_path("_static/style.css"))?,
        write_template(gen, writer, "docs/layout.html.tera", &gen.docs_path("_templates/layout.html"))?,
    ])
}

pub fn doc_requirements(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    let rel = gen.docs_path("requirements.txt");
    let mut defaults = DOC_REQUIREMENTS.to_vec();
    defaults.push(gen.settings.sphinx_html_theme.requirement());

    let existing = writer.read(&rel)?;
    let content = ensure_requirements(existing.as_deref(), &defaults);
    writer.write_clean(&rel, &content)?;
    Ok(vec![rel])
}

/// Theme defaults for `html_theme_options` and `html_context`.
fn theme_defaults(settings: &Settings) -> (Vec<(&'static str, Value)>, Vec<(&'static str, Value)>) {
    match settings.sphinx_html_theme {
        SphinxTheme::Alabaster => (
            vec![
                ("page_width", json!("1200px")),
                ("logo_name", json!(true)),
                ("github_user", json!(settings.username)),
                ("github_repo", json!(settings.repo_name)),
                ("description", json!(settings.short_desc)),
                ("github_banner", json!(true)),
                ("github_type", json!("star")),
                ("badge_branch", json!("master")),
                ("fixed_sidebar", json!(true)),
            ],
            vec![],
        ),
        SphinxTheme::SphinxRtdTheme
        | SphinxTheme::RepoHelperSphinxTheme
        | SphinxTheme::DomdfSphinxTheme => (
            vec![("logo_only", json!(false))],
            vec![
                ("display_github", json!(true)),
                ("github_user", json!(settings.username)),
                ("github_repo", json!(settings.repo_name)),
                ("github_version", json!("master")),
                ("conf_py_path", json!(format!("/{}/", settings.docs_dir.trim_end_matches('/')))),
            ],
        ),
    }
}

/// Theme options and HTML context with the theme's defaults filled in
/// wherever the user left a key unset.
pub fn merged_theme_settings(settings: &Settings) -> (Map<String, Value>, Map<String, Value>) {
    let (options, context) = theme_defaults(settings);
    (
        fill_absent(&settings.html_theme_options, options),
        fill_absent(&settings.html_context, context),
    )
}

/// `conf.py`.
pub fn sphinx_conf(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let rel = gen.docs_path("conf.py");
    let (options, context) = merged_theme_settings(gen.settings);
    let content = gen.render_with("docs/conf.py.tera", |ctx| {
        ctx.insert("html_theme_options", &options);
        ctx.insert("html_context", &context);
    })?;
    writer.write_clean(&rel, &content)?;
    Ok(vec![rel])
}

pub fn readthedocs(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "docs/readthedocs.yml.tera", ".readthedocs.yml")?])
}

/// `404.rst` is a starting point for the user, so it is never overwritten.
pub fn not_found_page(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    let rel = gen.docs_path("404.rst");
    let content = gen.render("docs/404.rst.tera")?;
    writer.write_if_absent(&rel, &content)?;
    Ok(vec![rel])
}

pub fn source_rst(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "docs/source.rst.tera", &gen.docs_path("Source.rst"))?])
}

pub fn docutils_conf(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(
        gen,
        writer,
        "docs/docutils.conf.tera",
        &gen.docs_path("docutils.conf"),
    )?])
}

pub fn building_rst(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(
        gen,
        writer,
        "docs/building.rst.tera",
        &gen.docs_path("Building.rst"),
    )?])
}

#[cfg(test)]
mod tests {
    use repo_helper_renderer::TemplateEngine;
    use tempfile::TempDir;

    use super::super::test_support::settings;
    use super::*;

    #[test]
    fn user_theme_options_win_over_defaults() {
        let settings = settings(
            "sphinx_html_theme: alabaster\nhtml_theme_options: {page_width: 900px}\n",
        );
        let (options, context) = merged_theme_settings(&settings);
        assert_eq!(options["page_width"], json!("900px"));
        assert_eq!(options["github_repo"], json!("widget-kit"));
        assert!(context.is_empty());
    }

    #[test]
    fn rtd_context_points_at_the_docs_dir() {
        let settings = settings("sphinx_html_theme: sphinx_rtd_theme\nhtml_context: {github_version: main}\n");
        let (options, context) = merged_theme_settings(&settings);
        assert_eq!(options["logo_only"], json!(false));
        assert_eq!(context["github_version"], json!("main"));
        assert_eq!(context["conf_py_path"], json!("/doc-source/"));
    }

    #[test]
    fn conf_py_contains_merged_options_as_python_literals() {
        let dir = TempDir::new().expect("tempdir");
        let settings = settings("enable_docs: true\nhtml_theme_options: {logo_only: true}\n");
        let engine = TemplateEngine::new(None).expect("engine");
        let gen = Generation::new(dir.path(), &settings, &engine).expect("generation");

        sphinx_conf(&gen, &mut FileWriter::new(dir.path(), false)).expect("conf");
        let conf = std::fs::read_to_string(dir.path().join("doc-source/conf.py")).expect("read");
        assert!(conf.contains("'logo_only': True,"), "{conf}");
        assert!(conf.contains("'display_github': True,"), "{conf}");
    }

    #[test]
    fn existing_404_page_is_kept() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("doc-source")).expect("mkdir");
        std::fs::write(dir.path().join("doc-source/404.rst"), "custom\n").expect("seed");

        let settings = settings("enable_docs: true\n");
        let engine = TemplateEngine::new(None).expect("engine");
        let gen = Generation::new(dir.path(), &settings, &engine).expect("generation");
        let managed = not_found_page(&gen, &mut FileWriter::new(dir.path(), false)).expect("404");

        assert_eq!(managed, ["doc-source/404.rst"]);
        let page = std::fs::read_to_string(dir.path().join("doc-source/404.rst")).expect("read");
        assert_eq!(page, "custom\n");
    }

    #[test]
    fn doc_requirements_include_the_theme() {
        let dir = TempDir::new().expect("tempdir");
        let settings = settings("enable_docs: true\n");
        let engine = TemplateEngine::new(None).expect("engine");
        let gen = Generation::new(dir.path(), &settings, &engine).expect("generation");

        doc_requirements(&gen, &mut FileWriter::new(dir.path(), false)).expect("requirements");
        let reqs = std::fs::read_to_string(dir.path().join("doc-source/requirements.txt")).expect("read");
        assert!(reqs.lines().any(|l| l == "domdf_sphinx_theme>=0.1.0"));
        assert!(reqs.starts_with("domdf_sphinx_theme"), "sorted case-insensitively: {reqs}");
    }
}
