//! Every embedded template renders against resolved settings.

use repo_helper_core::{resolve, Settings};
use repo_helper_renderer::{embedded_template_names, TemplateContext, TemplateEngine};

fn settings(extra: &str) -> Settings {
    let yaml = format!(
        "author: Jane Doe\nemail: jane@example.com\nusername: janedoe\nmodname: widget-kit\n\
         copyright_years: 2020\nversion: 1.2.3\nlicense: MIT\nshort_desc: Widgets, kitted.\n{extra}"
    );
    resolve(&serde_yaml::from_str(&yaml).expect("yaml")).expect("resolve")
}

/// Base context plus the per-generator variables some templates read.
fn full_context(settings: &Settings) -> tera::Context {
    let mut ctx = TemplateContext::new(settings).to_tera_context().expect("context");
    ctx.insert("ignores", &vec!["*.pyc", "build/"]);
    ctx.insert("known_third_party", &vec!["github", "pytest", "requests"]);
    ctx.insert("ci_name", "Linux");
    ctx.insert("ci_image", "ubuntu-18.04");
    ctx.insert("sphinx", &false);
    ctx.insert("wheel_tags", &vec!["cp36-cp36m", "cp38-cp38"]);
    ctx.insert("wheel_pythons", &vec!["\"36\"", "\"38\""]);
    ctx
}

#[test]
fn all_templates_render_with_every_feature_enabled() {
    let settings = settings(
        "enable_docs: true\nenable_tests: true\nenable_conda: true\nconda_channels: [conda-forge]\n\
         enable_releases: true\nenable_pre_commit: true\ndocker_shields: true\ndocker_name: jd/widget\n\
         console_scripts: ['widget = widget_kit.__main__:main']\nsource_dir: src\n\
         html_theme_options: {logo_only: true}\nextras_require: {cli: click}\n",
    );
    let engine = TemplateEngine::new(None).expect("engine");
    let ctx = full_context(&settings);

    for name in embedded_template_names() {
        let out = engine
            .render(name, &ctx)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
        assert!(!out.trim().is_empty(), "{name} rendered empty");
        assert!(!out.contains('\r'), "{name} contains CR");
    }
}

#[test]
fn all_templates_render_with_defaults() {
    let settings = settings("");
    let engine = TemplateEngine::new(None).expect("engine");
    let ctx = full_context(&settings);

    for name in embedded_template_names() {
        engine
            .render(name, &ctx)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
    }
}

#[test]
fn managed_message_is_stamped() {
    let settings = settings("");
    let engine = TemplateEngine::new(None).expect("engine");
    let ctx = full_context(&settings);

    let tox = engine.render("tox.ini.tera", &ctx).expect("tox");
    assert!(tox.contains("This file is managed by 'repo_helper'. Don't edit it directly."));
    assert!(tox.contains("envlist = py36, mypy"), "got:\n{tox}");
}

#[test]
fn conf_py_renders_python_literals() {
    let settings = settings("enable_docs: true\nhtml_theme_options: {logo_only: false, width: 1200px}\n");
    let engine = TemplateEngine::new(None).expect("engine");
    let ctx = full_context(&settings);

    let conf = engine.render("docs/conf.py.tera", &ctx).expect("conf");
    assert!(conf.contains("'logo_only': False,"), "got:\n{conf}");
    assert!(conf.contains("'width': '1200px',"), "got:\n{conf}");
    assert!(conf.contains("html_theme = 'domdf_sphinx_theme'"));
}

#[test]
fn ci_matrix_lists_every_python_version() {
    let settings = settings("python_versions: ['3.7', '3.8', '3.9-dev']\n");
    let engine = TemplateEngine::new(None).expect("engine");
    let ctx = full_context(&settings);

    let ci = engine.render("github/python_ci.yml.tera", &ctx).expect("ci");
    assert!(ci.contains(r#"python-version: "3.7", testenvs: "py37, build", experimental: False"#), "got:\n{ci}");
    assert!(ci.contains(r#"python-version: "3.9-dev", testenvs: "py39-dev, build", experimental: True"#));
    assert!(ci.contains("${{ matrix.config.python-version }}"));
}

#[test]
fn contributing_switches_block_style() {
    let settings = settings("");
    let engine = TemplateEngine::new(None).expect("engine");
    let mut ctx = full_context(&settings);

    let github = engine.render("contributing.rst.tera", &ctx).expect("github style");
    assert!(github.contains("```bash\ntox -e py36\n```"), "got:\n{github}");

    ctx.insert("sphinx", &true);
    let sphinx = engine.render("contributing.rst.tera", &ctx).expect("sphinx style");
    assert!(sphinx.contains(".. prompt:: bash\n\n    tox -e py36"), "got:\n{sphinx}");
}

#[test]
fn travis_lists_every_version_and_conda_deploy() {
    let settings = settings(
        "python_versions: ['3.6', '3.9-dev', pypy3]\nenable_conda: true\nconda_channels: [conda-forge]\n",
    );
    let engine = TemplateEngine::new(None).expect("engine");
    let ctx = full_context(&settings);

    let travis = engine.render("travis.yml.tera", &ctx).expect("travis");
    assert!(travis.contains("python:\n  - '3.6'\n  - '3.9-dev'\n  - 'pypy3'\n"), "got:\n{travis}");
    assert!(travis.contains("    - python: '3.9-dev'\n"));
    assert!(!travis.contains("    - python: '3.6'\n"));
    assert!(travis.contains("./.ci/travis_deploy_conda.sh"));

    let deploy = engine.render("travis_deploy_conda.sh.tera", &ctx).expect("deploy");
    assert!(deploy.contains("conda config --add channels conda-forge"), "got:\n{deploy}");
    assert!(deploy.contains("conda/dist/noarch/widget-kit-*.tar.bz2"));
}
