//! Test tooling: tox and the test-suite requirements.

use crate::error::SyncError;
use crate::requirements::ensure_requirements;
use crate::writer::FileWriter;

use super::{write_template, Generation};

const TEST_REQUIREMENTS: &[&str] = &[
    "coverage>=5.1",
    "pytest>=6.0.0",
    "pytest-cov>=2.8.1",
    "pytest-randomly>=3.3.1",
    "pytest-rerunfailures>=9.0",
    "coverage_pyver_pragma>=0.0.2",
];

pub fn tox(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "tox.ini.tera", "tox.ini")?])
}

/// `<tests_dir>/requirements.txt` with the test runner stack ensured.
pub fn test_requirements(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    let rel = gen.tests_path("requirements.txt");
    let existing = writer.read(&rel)?;
    let content = ensure_requirements(existing.as_deref(), TEST_REQUIREMENTS);
    writer.write_clean(&rel, &content)?;
    Ok(vec![rel])
}
