//! Markdown to PDF conversion entry points.
//!
//! The in-memory pipeline is total: any text produces a PDF. Only reading
//! the input and writing the output can fail. Output files are written to a
//! temporary file in the target directory and renamed into place, so a
//! failed conversion never leaves a partial PDF and never clobbers a
//! previous good one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::layout::{layout_with_options, LayoutOptions, PageGeometry};
use crate::model::Block;
use crate::parser::parse_blocks;
use crate::pdf::serialize_with_geometry;

/// Options for conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Layout options
    pub layout: LayoutOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout_options(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.layout = self.layout.with_geometry(geometry);
        self
    }
}

/// In-memory conversion output.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// PDF bytes
    pub bytes: Vec<u8>,
    /// Number of parsed blocks
    pub blocks: usize,
    /// Number of PDF pages
    pub pages: usize,
}

/// Summary of a file conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    /// Number of parsed blocks
    pub blocks: usize,
    /// Number of PDF pages
    pub pages: usize,
    /// Size of the written PDF in bytes
    pub bytes: usize,
    /// Path the PDF was written to
    pub output: PathBuf,
}

/// Convert Markdown text to PDF bytes with default options.
///
/// # Example
///
/// ```
/// let pdf = mdpdf::convert_str("# Title\n\nHello world.\n").unwrap();
/// assert!(pdf.starts_with(b"%PDF-1.4"));
/// ```
pub fn convert_str(markdown: &str) -> Result<Vec<u8>> {
    Ok(convert_str_with_options(markdown, &ConvertOptions::default())?.bytes)
}

/// Run parse, layout and serialization over Markdown text.
pub fn convert_str_with_options(markdown: &str, options: &ConvertOptions) -> Result<Conversion> {
    let blocks = parse_blocks(markdown);
    let pages = layout_with_options(&blocks, &options.layout);
    let bytes = serialize_with_geometry(&pages, &options.layout.geometry)?;
    Ok(Conversion {
        bytes,
        blocks: blocks.len(),
        pages: pages.len(),
    })
}

/// Convert a Markdown file to a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let report = mdpdf::convert_file("notes.md", "out/notes.pdf")?;
/// println!("{} pages", report.pages);
/// # Ok::<(), mdpdf::Error>(())
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertReport> {
    convert_file_with_options(input, output, &ConvertOptions::default())
}

/// Convert a Markdown file to a PDF file.
///
/// Fails with [`Error::InputNotFound`] before touching the output if the
/// input does not exist. Parent directories of `output` are created.
pub fn convert_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    let markdown = read_input(input)?;
    let conversion = convert_str_with_options(&markdown, options)?;
    write_atomic(output, &conversion.bytes)?;

    log::info!(
        "wrote {} ({} pages, {} bytes)",
        output.display(),
        conversion.pages,
        conversion.bytes.len()
    );
    Ok(ConvertReport {
        blocks: conversion.blocks,
        pages: conversion.pages,
        bytes: conversion.bytes.len(),
        output: output.to_path_buf(),
    })
}

/// Read a Markdown file and parse it into blocks.
///
/// Fails with [`Error::InputNotFound`] if the file does not exist.
///
/// # Example
///
/// ```no_run
/// let blocks = mdpdf::parse_file("notes.md")?;
/// println!("{} blocks", blocks.len());
/// # Ok::<(), mdpdf::Error>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(input: P) -> Result<Vec<Block>> {
    Ok(parse_blocks(&read_input(input.as_ref())?))
}

fn read_input(input: &Path) -> Result<String> {
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    Ok(fs::read_to_string(input)?)
}

/// Directory a temporary sibling of `output` should be created in.
fn output_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `bytes` to `output` via a temporary file and rename.
pub fn write_atomic(output: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source| Error::Write {
        path: output.to_path_buf(),
        source,
    };

    let dir = output_dir(output);
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(output).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Convert a Markdown file to a PDF file using async file I/O.
///
/// Parsing, layout and serialization run inline; only reading the input
/// and writing the output are asynchronous.
#[cfg(feature = "async")]
pub async fn convert_file_async<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    use tokio::io::AsyncWriteExt;

    let input = input.as_ref();
    let output = output.as_ref();

    if !tokio::fs::try_exists(input).await? {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    let markdown = tokio::fs::read_to_string(input).await?;
    let conversion = convert_str_with_options(&markdown, options)?;

    let write_err = |source| Error::Write {
        path: output.to_path_buf(),
        source,
    };
    let dir = output_dir(output);
    tokio::fs::create_dir_all(dir).await.map_err(write_err)?;

    // The temp file is only used for its unique path; tokio writes the bytes.
    let tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    let tmp_path = tmp.into_temp_path();
    let mut file = tokio::fs::File::create(&tmp_path).await.map_err(write_err)?;
    file.write_all(&conversion.bytes).await.map_err(write_err)?;
    file.sync_all().await.map_err(write_err)?;
    drop(file);
    tmp_path.persist(output).map_err(|e| write_err(e.error))?;

    log::info!("wrote {} ({} pages)", output.display(), conversion.pages);
    Ok(ConvertReport {
        blocks: conversion.blocks,
        pages: conversion.pages,
        bytes: conversion.bytes.len(),
        output: output.to_path_buf(),
    })
}
