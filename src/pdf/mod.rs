//! Minimal PDF writer.
//!
//! Produces uncompressed PDF 1.4 with the three standard Type1 fonts, one
//! content stream per page and a classic cross-reference table.

mod objects;
mod writer;

pub use objects::{ObjectArena, ObjectId};
pub use writer::{content_stream, escape_pdf_text, serialize, serialize_with_geometry};
