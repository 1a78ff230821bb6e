//! Built-in generators.
//!
//! Every generator has the [`GeneratorFn`](crate::registry::GeneratorFn)
//! shape: it renders through the shared [`Generation`], writes through the
//! run's [`FileWriter`](crate::writer::FileWriter) and returns the
//! repository-relative paths it manages. [`builtin_entries`] is the catalogue
//! in run order.

mod bots;
mod bumpversion;
mod ci_cd;
mod contributing;
mod docs;
mod gitignore;
mod linting;
mod packaging;
mod readme;
mod testing;

use std::path::Path;

use repo_helper_core::FeatureFlag::{
    EnableConda, EnableDocs, EnablePreCommit, EnableReleases, EnableTests,
};
use repo_helper_core::Settings;
use repo_helper_renderer::{TemplateContext, TemplateEngine};

use crate::error::SyncError;
use crate::registry::GeneratorEntry;

pub use docs::copy_docs_styling;

/// Everything a generator reads: the repository, the resolved settings and
/// a renderer primed with the base template context.
pub struct Generation<'a> {
    pub repo: &'a Path,
    pub settings: &'a Settings,
    engine: &'a TemplateEngine,
    base: tera::Context,
}

impl<'a> Generation<'a> {
    pub fn new(
        repo: &'a Path,
        settings: &'a Settings,
        engine: &'a TemplateEngine,
    ) -> Result<Self, SyncError> {
        let base = TemplateContext::new(settings).to_tera_context()?;
        Ok(Generation {
            repo,
            settings,
            engine,
            base,
        })
    }

    /// Renders `template` against the base context.
    pub fn render(&self, template: &str) -> Result<String, SyncError> {
        Ok(self.engine.render(template, &self.base)?)
    }

    /// Renders `template` against a copy of the base context extended by
    /// `extend`. The base context itself is never modified.
    pub fn render_with<F>(&self, template: &str, extend: F) -> Result<String, SyncError>
    where
        F: FnOnce(&mut tera::Context),
    {
        let mut ctx = self.base.clone();
        extend(&mut ctx);
        Ok(self.engine.render(template, &ctx)?)
    }

    /// `file` inside the documentation directory.
    pub fn docs_path(&self, file: &str) -> String {
        format!("{}/{file}", self.settings.docs_dir.trim_end_matches('/'))
    }

    /// `file` inside the tests directory.
    pub fn tests_path(&self, file: &str) -> String {
        format!("{}/{file}", self.settings.tests_dir.trim_end_matches('/'))
    }
}

/// The built-in catalogue, in run order. `isort` is marked to run last.
pub fn builtin_entries() -> Vec<GeneratorEntry> {
    vec![
        GeneratorEntry::new("copy_pypi_2_github", &[EnableReleases], bots::copy_pypi_2_github),
        GeneratorEntry::new("lint_roller", &[], linting::lint_roller),
        GeneratorEntry::new("stale_bot", &[], bots::stale_bot),
        GeneratorEntry::new("auto_assign", &[], bots::auto_assign),
        GeneratorEntry::new("readme", &[], readme::readme),
        GeneratorEntry::new("index.rst", &[EnableDocs], readme::docs_index),
        GeneratorEntry::new("doc_requirements", &[EnableDocs], docs::doc_requirements),
        GeneratorEntry::new("pylintrc", &[], linting::pylintrc),
        GeneratorEntry::new("manifest", &[], packaging::manifest),
        GeneratorEntry::new("setup", &[], packaging::setup_py),
        GeneratorEntry::new("setup_cfg", &[], packaging::setup_cfg),
        GeneratorEntry::new("pkginfo", &[], packaging::pkginfo),
        GeneratorEntry::new("conf", &[EnableDocs], docs::sphinx_conf),
        GeneratorEntry::new("gitignore", &[], gitignore::gitignore),
        GeneratorEntry::new("rtfd", &[EnableDocs], docs::readthedocs),
        GeneratorEntry::new("travis", &[], ci_cd::travis),
        GeneratorEntry::new("actions", &[], ci_cd::actions),
        GeneratorEntry::new("manylinux", &[], ci_cd::manylinux),
        GeneratorEntry::new("tox", &[], testing::tox),
        GeneratorEntry::new("yapf", &[], linting::yapf),
        GeneratorEntry::new("test_requirements", &[EnableTests], testing::test_requirements),
        GeneratorEntry::new("dependabot", &[], bots::dependabot),
        GeneratorEntry::new("imgbot", &[], bots::imgbot),
        GeneratorEntry::new("octocheese", &[], ci_cd::octocheese),
        GeneratorEntry::new("travis_deploy_conda", &[EnableConda], ci_cd::travis_deploy_conda),
        GeneratorEntry::new("make_conda_recipe", &[EnableConda], ci_cd::make_conda_recipe),
        GeneratorEntry::new("bumpversion", &[], bumpversion::bumpversion),
        GeneratorEntry::new("issue_templates", &[], contributing::issue_templates),
        GeneratorEntry::new("404", &[EnableDocs], docs::not_found_page),
        GeneratorEntry::new("Source_rst", &[EnableDocs], docs::source_rst),
        GeneratorEntry::new("docs_action", &[EnableDocs], ci_cd::docs_action),
        GeneratorEntry::new("docutils_conf", &[EnableDocs], docs::docutils_conf),
        GeneratorEntry::new("Building_rst", &[EnableDocs], docs::building_rst),
        GeneratorEntry::new("contributing", &[], contributing::contributing),
        GeneratorEntry::new("contributing", &[EnableDocs], contributing::docs_contributing),
        GeneratorEntry::new("pre-commit", &[EnablePreCommit], linting::pre_commit),
        GeneratorEntry::new("pyproject", &[], packaging::pyproject),
        GeneratorEntry::new("isort", &[], linting::isort).last(),
    ]
}

/// Full-replace write of `template` to `rel`; returns `rel` for the
/// managed-file list.
fn write_template(
    gen: &Generation<'_>,
    writer: &mut crate::writer::FileWriter,
    template: &str,
    rel: &str,
) -> Result<String, SyncError> {
    let content = gen.render(template)?;
    writer.write_clean(rel, &content)?;
    Ok(rel.to_owned())
}

#[cfg(test)]
pub(crate) mod test_support {
    use repo_helper_core::{resolve, Settings};

    pub const BASE: &str = "author: Jane Doe\nemail: jane@example.com\nusername: janedoe\n\
        modname: widget-kit\ncopyright_years: 2020\nversion: 1.2.3\nlicense: MIT\n\
        short_desc: Widgets, kitted.\n";

    pub fn settings(extra: &str) -> Settings {
        let doc = serde_yaml::from_str(&format!("{BASE}{extra}")).expect("yaml");
        resolve(&doc).expect("resolve")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::settings;
    use super::*;

    #[test]
    fn catalogue_has_one_entry_per_file_group() {
        let entries = builtin_entries();
        assert_eq!(entries.len(), 38);
        assert_eq!(entries[0].name, "copy_pypi_2_github");
        let contributing: Vec<_> = entries
            .iter()
            .filter(|e| e.name == "contributing")
            .map(|e| e.requires)
            .collect();
        assert_eq!(contributing, [&[][..], &[EnableDocs][..]]);

        let position = |name: &str| entries.iter().position(|e| e.name == name).expect(name);
        assert!(position("travis") < position("actions"));
        assert!(position("actions") < position("manylinux"));
        assert!(position("travis_deploy_conda") < position("make_conda_recipe"));
    }

    #[test]
    fn render_with_leaves_the_base_context_alone() {
        let settings = settings("");
        let engine = TemplateEngine::new(None).expect("engine");
        let gen = Generation::new(Path::new("."), &settings, &engine).expect("generation");

        let with_sphinx = gen
            .render_with("contributing.rst.tera", |ctx| ctx.insert("sphinx", &true))
            .expect("render");
        assert!(with_sphinx.contains(".. prompt:: bash"));
        assert!(gen.render("contributing.rst.tera").is_err(), "`sphinx` is not in the base context");
    }

    #[test]
    fn docs_and_tests_paths_ignore_trailing_slashes() {
        let settings = settings("docs_dir: docs/\ntests_dir: t\n");
        let engine = TemplateEngine::new(None).expect("engine");
        let gen = Generation::new(Path::new("."), &settings, &engine).expect("generation");
        assert_eq!(gen.docs_path("conf.py"), "docs/conf.py");
        assert_eq!(gen.tests_path("requirements.txt"), "t/requirements.txt");
    }
}
