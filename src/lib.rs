//! # mdpdf
//!
//! Dependency-light Markdown to PDF conversion for Rust.
//!
//! A conversion runs in three stages, each a pure function of the previous
//! stage's output:
//!
//! 1. [`parser`] turns Markdown text into a flat list of [`Block`]s.
//! 2. [`layout`] wraps and paginates blocks into [`Page`]s of positioned
//!    [`DrawCommand`]s.
//! 3. [`pdf`] serializes pages into PDF 1.4 bytes using the standard
//!    Helvetica, Helvetica-Bold and Courier fonts.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> mdpdf::Result<()> {
//!     // Convert a file, creating the output directory if needed
//!     let report = mdpdf::convert_file("notes.md", "output/pdf/notes.pdf")?;
//!     println!("{} pages", report.pages);
//!
//!     // Or convert in memory
//!     let bytes = mdpdf::convert_str("# Title\n\n- one\n- two\n")?;
//!     assert!(bytes.starts_with(b"%PDF-1.4"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Markdown subset**: ATX headings, paragraphs, bullet and ordered
//!   lists, fenced code blocks; inline markup is stripped to plain text
//! - **Deterministic output**: identical input always yields identical bytes
//! - **Atomic writes**: a failed conversion never replaces a good PDF
//! - **Rebuild loop**: [`watch::Rebuilder`] regenerates output on change
//! - **Async I/O**: `convert_file_async` behind the `async` feature

pub mod convert;
pub mod dump;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod pdf;
pub mod verify;
pub mod watch;

// Re-export commonly used types
#[cfg(feature = "async")]
pub use convert::convert_file_async;
pub use convert::{
    convert_file, convert_file_with_options, convert_str, convert_str_with_options, parse_file,
    Conversion, ConvertOptions, ConvertReport,
};
pub use dump::{blocks_to_json, JsonFormat};
pub use error::{Error, Result};
pub use layout::{layout, LayoutOptions, PageGeometry};
pub use model::{Block, DrawCommand, FontKind, ListItem, Page};
pub use parser::parse_blocks;
pub use pdf::serialize;
pub use verify::{inspect_pdf, is_valid_pdf, PdfSummary};
pub use watch::{BuildEvent, Rebuilder, WatchOptions};

use std::path::{Path, PathBuf};

/// Builder for configuring and running conversions.
///
/// # Example
///
/// ```no_run
/// use mdpdf::MdPdf;
///
/// let report = MdPdf::new()
///     .a4()
///     .with_margins(72.0)
///     .convert_file("README.md", "out/readme.pdf")?;
/// # Ok::<(), mdpdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MdPdf {
    options: ConvertOptions,
}

impl MdPdf {
    /// Create a new builder with US Letter pages and 64pt margins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use A4 media instead of US Letter.
    pub fn a4(self) -> Self {
        let margins = self.options.layout.geometry.margin_left;
        self.with_geometry(PageGeometry::a4().with_margins(margins))
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.options = self.options.with_geometry(geometry);
        self
    }

    /// Set all four margins, keeping the current media size.
    pub fn with_margins(self, margin: f64) -> Self {
        let geometry = self.options.layout.geometry.with_margins(margin);
        self.with_geometry(geometry)
    }

    /// Replace the conversion options wholesale.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Current conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse Markdown into blocks.
    pub fn parse(&self, markdown: &str) -> Vec<Block> {
        parse_blocks(markdown)
    }

    /// Parse and lay out Markdown into pages.
    pub fn layout(&self, markdown: &str) -> Vec<Page> {
        layout::layout_with_options(&parse_blocks(markdown), &self.options.layout)
    }

    /// Convert Markdown text to PDF bytes.
    pub fn convert_str(&self, markdown: &str) -> Result<Vec<u8>> {
        Ok(convert_str_with_options(markdown, &self.options)?.bytes)
    }

    /// Convert a Markdown file to a PDF file.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConvertReport> {
        convert_file_with_options(input, output, &self.options)
    }

    /// Create a rebuilder that converts with these options.
    pub fn rebuilder(&self, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Rebuilder {
        Rebuilder::new(input, output).with_options(self.options.clone())
    }
}
