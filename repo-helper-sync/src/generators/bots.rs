//! Repository bots: stale issues, auto-assignment, dependabot, imgbot.

use crate::error::SyncError;
use crate::writer::FileWriter;

use super::{write_template, Generation};

const COPY_PYPI_2_GITHUB: &str = ".ci/copy_pypi_2_github.py";

/// Deletes the release-copying script superseded by octocheese.
pub fn copy_pypi_2_github(
    _gen: &Generation<'_>,
    writer: &mut FileWriter,
) -> Result<Vec<String>, SyncError> {
    writer.remove(COPY_PYPI_2_GITHUB)?;
    Ok(vec![COPY_PYPI_2_GITHUB.to_owned()])
}

pub fn stale_bot(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "github/stale.yml.tera", ".github/stale.yml")?])
}

/// The assignment workflow and its bot configuration.
pub fn auto_assign(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![
        write_template(gen, writer, "github/assign.yml.tera", ".github/workflows/assign.yml")?,
        write_template(gen, writer, "github/auto_assign.yml.tera", ".github/auto_assign.yml")?,
    ])
}

pub fn dependabot(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    Ok(vec![write_template(gen, writer, "dependabot.yml.tera", ".dependabot/config.yml")?])
}

/// `.imgbotconfig`; SVGs are always ignored on top of `imgbot_ignore`.
pub fn imgbot(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let mut ignored = vec!["**/*.svg".to_owned()];
    ignored.extend(gen.settings.imgbot_ignore.iter().cloned());

    let content = gen.render_with("imgbotconfig.tera", |ctx| ctx.insert("imgbot_ignore", &ignored))?;
    writer.write_clean(".imgbotconfig", &content)?;
    Ok(vec![".imgbotconfig".to_owned()])
}
