//! Packaging metadata: setup.py, setup.cfg, pyproject.toml, MANIFEST.in and
//! `__pkginfo__.py`.

use crate::error::SyncError;
use crate::writer::FileWriter;

use super::{write_template, Generation};

pub fn manifest(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "manifest.in.tera", "MANIFEST.in")?])
}

pub fn setup_py(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "setup.py.tera", "setup.py")?])
}

pub fn setup_cfg(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "setup.cfg.tera", "setup.cfg")?])
}

pub fn pkginfo(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "pkginfo.py.tera", "__pkginfo__.py")?])
}

pub fn pyproject(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "pyproject.toml.tera", "pyproject.toml")?])
}
