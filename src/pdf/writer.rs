//! PDF 1.4 serialization of laid-out pages.

use std::io::Write;

use crate::error::Result;
use crate::layout::PageGeometry;
use crate::model::{DrawCommand, FontKind, Page};

use super::objects::{ObjectArena, ObjectId};

/// File header. The comment line carries non-text marker bytes by convention.
const PDF_HEADER: &[u8] = b"%PDF-1.4\n%AXRA\n";

/// Serialize pages into a complete PDF document on US Letter media.
///
/// # Example
///
/// ```
/// use mdpdf::{layout, parser, pdf};
///
/// let pages = layout::layout(&parser::parse_blocks("Hello"));
/// let bytes = pdf::serialize(&pages).unwrap();
/// assert!(bytes.starts_with(b"%PDF-1.4"));
/// assert!(bytes.ends_with(b"%%EOF\n"));
/// ```
pub fn serialize(pages: &[Page]) -> Result<Vec<u8>> {
    serialize_with_geometry(pages, &PageGeometry::letter())
}

/// Serialize pages using `geometry` for each page's MediaBox.
pub fn serialize_with_geometry(pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>> {
    let mut arena = ObjectArena::new();

    let fonts: Vec<(FontKind, ObjectId)> = FontKind::ALL
        .iter()
        .map(|&font| {
            let id = arena.add(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} >>",
                font.base_font()
            ));
            (font, id)
        })
        .collect();

    let mut page_entries = Vec::with_capacity(pages.len());
    for page in pages {
        let stream = content_stream(page);
        let content_id = arena.add(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
        let page_id = arena.reserve();
        page_entries.push((content_id, page_id));
    }

    let pages_id = arena.reserve();

    let font_resources = fonts
        .iter()
        .map(|(font, id)| format!("/{} {}", font.alias(), id.reference()))
        .collect::<Vec<_>>()
        .join(" ");
    for &(content_id, page_id) in &page_entries {
        arena.set(
            page_id,
            format!(
                "<< /Type /Page /Parent {} /MediaBox [0 0 {} {}] /Resources << /Font << {} >> >> /Contents {} >>",
                pages_id.reference(),
                geometry.width,
                geometry.height,
                font_resources,
                content_id.reference()
            ),
        )?;
    }

    let kids = page_entries
        .iter()
        .map(|(_, page_id)| page_id.reference())
        .collect::<Vec<_>>()
        .join(" ");
    arena.set(
        pages_id,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_entries.len()),
    )?;

    let catalog_id = arena.add(format!("<< /Type /Catalog /Pages {} >>", pages_id.reference()));

    let bytes = write_document(&arena, catalog_id)?;
    log::debug!(
        "serialized {} pages into {} objects ({} bytes)",
        pages.len(),
        arena.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Content stream operators for one page, one text object per line.
pub fn content_stream(page: &Page) -> String {
    page.iter().map(text_operator).collect::<Vec<_>>().join("\n")
}

fn text_operator(command: &DrawCommand) -> String {
    format!(
        "BT /{} {:.2} Tf 1 0 0 1 {:.2} {:.2} Tm ({}) Tj ET",
        command.font.alias(),
        command.size,
        command.x,
        command.y,
        escape_pdf_text(&command.text)
    )
}

/// Escape a string for use inside a PDF literal string.
///
/// Backslashes are doubled before parentheses are escaped so the added
/// backslashes are not themselves escaped again.
pub fn escape_pdf_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Write header, objects, cross-reference table and trailer.
fn write_document(arena: &ObjectArena, root: ObjectId) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(PDF_HEADER);

    let mut offsets = Vec::with_capacity(arena.len());
    for (id, body) in arena.bodies()? {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n{}\nendobj\n", id, body)?;
    }

    let xref_offset = out.len();
    write!(out, "xref\n0 {}\n", offsets.len() + 1)?;
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        write!(out, "{:010} 00000 n \n", offset)?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root {} >>\nstartxref\n{}\n%%EOF\n",
        offsets.len() + 1,
        root.reference(),
        xref_offset
    )?;
    Ok(out)
}
