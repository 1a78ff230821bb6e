//! README.rst and the docs index: marker-delimited blocks are re-rendered
//! in place, everything else belongs to the user.

use crate::blocks::replace_block;
use crate::error::SyncError;
use crate::writer::FileWriter;

use super::Generation;

const README_BLOCKS: &[(&str, &str)] = &[
    ("short_desc", "blocks/short_desc.rst.tera"),
    ("shields", "blocks/shields.rst.tera"),
    ("installation", "blocks/readme_installation.rst.tera"),
];

const INDEX_BLOCKS: &[(&str, &str)] = &[
    ("short_desc", "blocks/short_desc.rst.tera"),
    ("shields", "blocks/shields.rst.tera"),
    ("installation", "blocks/docs_installation.rst.tera"),
    ("links", "blocks/docs_links.rst.tera"),
];

/// Starts from the current file (or the rendered `skeleton` when there is
/// none) and swaps each named block for its fresh rendering.
fn rewrite_blocks(
    gen: &Generation<'_>,
    writer: &mut FileWriter,
    rel: &str,
    skeleton: &str,
    blocks: &[(&str, &str)],
) -> Result<(), SyncError> {
    let mut text = match writer.read(rel)? {
        Some(existing) => existing,
        None => gen.render(skeleton)?,
    };
    for (name, template) in blocks {
        let rendered = gen.render(template)?;
        text = replace_block(&text, name, &rendered);
    }
    writer.write_clean(rel, &text)?;
    Ok(())
}

pub fn readme(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    rewrite_blocks(gen, writer, "README.rst", "readme.rst.tera", README_BLOCKS)?;
    Ok(vec!["README.rst".to_owned()])
}

pub fn docs_index(gen: &Generation<'_>, writer: &mut FileWriter) -> Result<Vec<String>, SyncError> {
    let rel = gen.docs_path("index.rst");
    rewrite_blocks(gen, writer, &rel, "docs/index.rst.tera", INDEX_BLOCKS)?;
    Ok(vec![rel])
}
