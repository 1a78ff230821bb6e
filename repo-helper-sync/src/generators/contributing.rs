//! Contributor guidance and GitHub issue templates.

use crate::error::SyncError;
use crate::writer::FileWriter;

use super::{write_template, Generation};

/// `CONTRIBUTING.rst` in GitHub-flavoured style. A leftover
/// `CONTRIBUTING.md` would shadow it on GitHub, so it is removed.
pub fn contributing(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let content = gen.render_with("contributing.rst.tera", |ctx| ctx.insert("sphinx", &false))?;
    writer.write_clean("CONTRIBUTING.rst", &content)?;
    writer.remove("CONTRIBUTING.md")?;
    Ok(vec!["CONTRIBUTING.rst".to_owned(), "CONTRIBUTING.md".to_owned()])
}

/// The same guide for the docs, with Sphinx prompt blocks.
pub fn docs_contributing(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    let rel = gen.docs_path("contributing.rst");
    let content = gen.render_with("contributing.rst.tera", |ctx| ctx.insert("sphinx", &true))?;
    writer.write_clean(&rel, &content)?;
    Ok(vec![rel])
}

pub fn issue_templates(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    Ok(vec![
        write_template(
            gen,
            writer,
            "github/bug_report.md.tera",
            ".github/ISSUE_TEMPLATE/bug_report.md",
        )?,
        write_template(
            gen,
            writer,
            "github/feature_request.md.tera",
            ".github/ISSUE_TEMPLATE/feature_request.md",
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use repo_helper_renderer::TemplateEngine;
    use tempfile::TempDir;

    use super::super::test_support::settings;
    use super::*;

    #[test]
    fn markdown_guide_is_replaced_by_rst() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("CONTRIBUTING.md"), "# old\n").expect("seed");

        let settings = settings("");
        let engine = TemplateEngine::new(None).expect("engine");
        let gen = Generation::new(dir.path(), &settings, &engine).expect("generation");
        contributing(&gen, &mut FileWriter::new(dir.path(), false)).expect("contributing");

        assert!(!dir.path().join("CONTRIBUTING.md").exists());
        let guide = std::fs::read_to_string(dir.path().join("CONTRIBUTING.rst")).expect("read");
        assert!(guide.contains("```bash"));
    }
}
