//! `.gitignore`.

use crate::error::SyncError;
use crate::writer::FileWriter;

use super::Generation;

const STANDARD_IGNORES: &[&str] = &[
    "__pycache__/",
    "*.py[cod]",
    "*$py.class",
    "*.so",
    ".Python",
    "build/",
    "develop-eggs/",
    "dist/",
    "downloads/",
    "eggs/",
    ".eggs/",
    "lib/",
    "lib64/",
    "parts/",
    "sdist/",
    "var/",
    "wheels/",
    "*.egg-info/",
    ".installed.cfg",
    "*.egg",
    "MANIFEST",
    "*.manifest",
    "*.spec",
    "pip-log.txt",
    "pip-delete-this-directory.txt",
    "htmlcov/",
    ".tox/",
    ".coverage",
    ".coverage.*",
    ".cache",
    "nosetests.xml",
    "coverage.xml",
    "*.cover",
    ".hypothesis/",
    ".pytest_cache/",
    "cover/",
    "*.mo",
    "*.pot",
    "*.log",
    ".ipynb_checkpoints",
    ".env",
    ".venv",
    "env/",
    "venv/",
    "ENV/",
    "env.bak/",
    "venv.bak/",
    ".mypy_cache/",
    ".dmypy.json",
    "dmypy.json",
    ".pyre/",
    ".idea",
    ".vscode",
    "*.iml",
    "*.ipr",
    "*.iws",
    "*.orig",
    "*.bak",
    ".DS_Store",
];

/// Standard Python ignores, then the docs build output, then the user's
/// `additional_ignore` entries.
fn ignores(gen: &Generation<'_>) -> Vec<String> {
    let mut ignores: Vec<String> = STANDARD_IGNORES.iter().map(|s| (*s).to_owned()).collect();
    if gen.settings.enable_docs {
        ignores.push(gen.docs_path("build"));
    }
    ignores.extend(gen.settings.additional_ignore.iter().cloned());
    ignores
}

pub fn gitignore(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let ignores = ignores(gen);
    let content = gen.render_with("gitignore.tera", |ctx| ctx.insert("ignores", &ignores))?;
    writer.write_clean(".gitignore", &content)?;
    Ok(vec![".gitignore".to_owned()])
}
