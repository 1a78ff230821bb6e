//! CI workflows (GitHub Actions and Travis) and release tooling.

use repo_helper_core::Platform;

use crate::error::SyncError;
use crate::writer::FileWriter;

use super::{write_template, Generation};

/// Workflow file and runner image per platform.
fn workflow(platform: Platform) -> (&'static str, &'static str) {
    match platform {
        Platform::Windows => (".github/workflows/python_ci.yml", "windows-2019"),
        Platform::MacOs => (".github/workflows/python_ci_macos.yml", "macos-latest"),
        Platform::Linux => (".github/workflows/python_ci_linux.yml", "ubuntu-18.04"),
    }
}

/// One test workflow per supported platform. Workflows for platforms no
/// longer listed are removed; all three paths stay managed either way.
pub fn actions(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let mut managed = Vec::with_capacity(Platform::ALL.len());
    for platform in Platform::ALL {
        let (rel, image) = workflow(platform);
        if gen.settings.supports(platform) {
            let content = gen.render_with("github/python_ci.yml.tera", |ctx| {
                ctx.insert("ci_name", platform.as_str());
                ctx.insert("ci_image", image);
            })?;
            writer.write_clean(rel, &content)?;
        } else {
            writer.remove(rel)?;
        }
        managed.push(rel.to_owned());
    }
    Ok(managed)
}

/// `.travis.yml`, kept for repositories still building there.
pub fn travis(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "travis.yml.tera", ".travis.yml")?])
}

/// CPython wheel ABI tags and their `PYVERSIONS` entries for the listed
/// versions. Development and non-CPython versions get no wheels.
fn wheel_targets(versions: &[String]) -> (Vec<String>, Vec<String>) {
    let mut tags = Vec::new();
    let mut pythons = Vec::new();
    for version in versions {
        let Some(minor) = version.strip_prefix("3.").and_then(|m| m.parse::<u32>().ok()) else {
            continue;
        };
        if minor < 5 {
            continue;
        }
        // the `m` ABI flag was dropped in 3.8
        let abi = if minor < 8 { "m" } else { "" };
        tags.push(format!("cp3{minor}-cp3{minor}{abi}"));
        pythons.push(format!("\"3{minor}\""));
    }
    (tags, pythons)
}

/// manylinux wheel builds, only for packages with compiled code that
/// support Linux. The workflow is removed otherwise.
pub fn manylinux(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    const REL: &str = ".github/workflows/manylinux_build.yml";
    if !gen.settings.pure_python && gen.settings.supports(Platform::Linux) {
        let (tags, pythons) = wheel_targets(&gen.settings.python_versions);
        let content = gen.render_with("github/manylinux_build.yml.tera", |ctx| {
            ctx.insert("wheel_tags", &tags);
            ctx.insert("wheel_pythons", &pythons);
        })?;
        writer.write_clean(REL, &content)?;
    } else {
        writer.remove(REL)?;
    }
    Ok(vec![REL.to_owned()])
}

pub fn docs_action(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(
        gen,
        writer,
        "github/docs_test_action.yml.tera",
        ".github/workflows/docs_test_action.yml",
    )?])
}

/// Release-to-GitHub workflow; only meaningful for packages on PyPI.
pub fn octocheese(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    const REL: &str = ".github/workflows/octocheese.yml";
    if gen.settings.on_pypi {
        write_template(gen, writer, "github/octocheese.yml.tera", REL)?;
    } else {
        writer.remove(REL)?;
    }
    Ok(vec![REL.to_owned()])
}

pub fn make_conda_recipe(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(
        gen,
        writer,
        "make_conda_recipe.py.tera",
        "make_conda_recipe.py",
    )?])
}

/// Conda build-and-upload script run from Travis.
pub fn travis_deploy_conda(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    let rel = write_template(
        gen,
        writer,
        "travis_deploy_conda.sh.tera",
        ".ci/travis_deploy_conda.sh",
    )?;
    writer.make_executable(&rel)?;
    Ok(vec![rel])
}

#[cfg(test)]
mod tests {
    use repo_helper_renderer::TemplateEngine;
    use tempfile::TempDir;

    use super::super::test_support::settings;
    use super::*;

    #[test]
    fn dropped_platform_workflow_is_removed() {
        let dir = TempDir::new().expect("tempdir");
        let engine = TemplateEngine::new(None).expect("engine");

        let all = settings("");
        let gen = Generation::new(dir.path(), &all, &engine).expect("generation");
        actions(&gen, &mut FileWriter::new(dir.path(), false)).expect("all platforms");
        let macos = dir.path().join(".github/workflows/python_ci_macos.yml");
        assert!(macos.exists());

        let linux_only = settings("platforms: [Linux]\n");
        let gen = Generation::new(dir.path(), &linux_only, &engine).expect("generation");
        let managed = actions(&gen, &mut FileWriter::new(dir.path(), false)).expect("linux only");

        assert_eq!(managed.len(), 3);
        assert!(!macos.exists());
        let linux = std::fs::read_to_string(dir.path().join(".github/workflows/python_ci_linux.yml"))
            .expect("linux workflow");
        assert!(linux.contains("name: Linux Tests"));
        assert!(linux.contains("runs-on: \"ubuntu-18.04\""));
    }

    #[test]
    fn octocheese_follows_on_pypi() {
        let dir = TempDir::new().expect("tempdir");
        let engine = TemplateEngine::new(None).expect("engine");
        let rel = dir.path().join(".github/workflows/octocheese.yml");

        let on = settings("");
        let gen = Generation::new(dir.path(), &on, &engine).expect("generation");
        octocheese(&gen, &mut FileWriter::new(dir.path(), false)).expect("write");
        assert!(rel.exists());

        let off = settings("on_pypi: false\n");
        let gen = Generation::new(dir.path(), &off, &engine).expect("generation");
        octocheese(&gen, &mut FileWriter::new(dir.path(), false)).expect("remove");
        assert!(!rel.exists());
    }

    #[test]
    fn wheel_targets_follow_the_abi_flag_change() {
        let versions: Vec<String> = ["3.6", "3.7", "3.8", "3.9", "3.10-dev", "pypy3"]
            .iter()
            .map(|v| (*v).to_owned())
            .collect();
        let (tags, pythons) = wheel_targets(&versions);
        assert_eq!(tags, ["cp36-cp36m", "cp37-cp37m", "cp38-cp38", "cp39-cp39"]);
        assert_eq!(pythons, ["\"36\"", "\"37\"", "\"38\"", "\"39\""]);
    }

    #[test]
    fn manylinux_only_for_compiled_linux_packages() {
        let dir = TempDir::new().expect("tempdir");
        let engine = TemplateEngine::new(None).expect("engine");
        let rel = dir.path().join(".github/workflows/manylinux_build.yml");

        let compiled = settings("pure_python: false\npython_versions: ['3.7', '3.8']\n");
        let gen = Generation::new(dir.path(), &compiled, &engine).expect("generation");
        let managed = manylinux(&gen, &mut FileWriter::new(dir.path(), false)).expect("write");
        assert_eq!(managed, [".github/workflows/manylinux_build.yml"]);
        let workflow = std::fs::read_to_string(&rel).expect("workflow");
        assert!(workflow.contains("python-versions: \"cp37-cp37m cp38-cp38\""), "{workflow}");
        assert!(workflow.contains(r#"PYVERSIONS: '"37" "38"'"#), "{workflow}");

        let no_linux = settings("pure_python: false\nplatforms: [Windows, macOS]\n");
        let gen = Generation::new(dir.path(), &no_linux, &engine).expect("generation");
        let managed = manylinux(&gen, &mut FileWriter::new(dir.path(), false)).expect("remove");
        assert_eq!(managed.len(), 1);
        assert!(!rel.exists());

        let pure = settings("");
        let gen = Generation::new(dir.path(), &pure, &engine).expect("generation");
        manylinux(&gen, &mut FileWriter::new(dir.path(), false)).expect("pure");
        assert!(!rel.exists());
    }

    #[cfg(unix)]
    #[test]
    fn conda_deploy_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("tempdir");
        let engine = TemplateEngine::new(None).expect("engine");
        let conda = settings("enable_conda: true\nconda_channels: [conda-forge]\n");
        let gen = Generation::new(dir.path(), &conda, &engine).expect("generation");

        let managed = travis_deploy_conda(&gen, &mut FileWriter::new(dir.path(), false)).expect("write");
        assert_eq!(managed, [".ci/travis_deploy_conda.sh"]);
        let script = dir.path().join(".ci/travis_deploy_conda.sh");
        let mode = std::fs::metadata(&script).expect("meta").permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
