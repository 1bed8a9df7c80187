//! Structural validation of generated PDF files.
//!
//! This is not a PDF parser. It checks exactly the properties the writer
//! promises: a versioned header, a trailing `%%EOF`, a `startxref` that
//! points at a classic cross-reference table, and xref offsets that land on
//! the matching `N 0 obj` headers.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.4"
const EOF_MARKER: &[u8] = b"%%EOF";
const STARTXREF: &[u8] = b"startxref";

/// Summary of a structurally valid PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSummary {
    /// PDF version from the header (e.g., "1.4")
    pub version: String,
    /// Number of in-use objects in the xref table
    pub object_count: usize,
    /// `/Count` of the root Pages node
    pub page_count: usize,
    /// Object number of the document catalog
    pub root: usize,
    /// Byte offset of the xref table
    pub xref_offset: usize,
}

impl std::fmt::Display for PdfSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PDF {} ({} objects, {} pages)",
            self.version, self.object_count, self.page_count
        )
    }
}

struct TrailerPatterns {
    size: Regex,
    root: Regex,
    pages: Regex,
    count: Regex,
}

impl TrailerPatterns {
    fn get() -> &'static Self {
        static PATTERNS: OnceLock<TrailerPatterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Self {
            size: Regex::new(r"/Size\s+(\d+)").unwrap(),
            root: Regex::new(r"/Root\s+(\d+)\s+0\s+R").unwrap(),
            pages: Regex::new(r"/Pages\s+(\d+)\s+0\s+R").unwrap(),
            count: Regex::new(r"/Count\s+(\d+)").unwrap(),
        })
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidPdf(msg.into())
}

/// Validate a PDF file on disk.
pub fn inspect_pdf_file<P: AsRef<Path>>(path: P) -> Result<PdfSummary> {
    let data = std::fs::read(path)?;
    inspect_pdf(&data)
}

/// Validate PDF bytes and summarize their structure.
///
/// # Example
///
/// ```
/// let bytes = mdpdf::convert_str("# Hi").unwrap();
/// let summary = mdpdf::verify::inspect_pdf(&bytes).unwrap();
/// assert_eq!(summary.version, "1.4");
/// assert_eq!(summary.page_count, 1);
/// ```
pub fn inspect_pdf(data: &[u8]) -> Result<PdfSummary> {
    let version = header_version(data)?;

    let tail = trim_end(data);
    if !tail.ends_with(EOF_MARKER) {
        return Err(invalid("missing %%EOF marker"));
    }

    let xref_offset = startxref_value(tail)?;
    if !data.get(xref_offset..).is_some_and(|rest| rest.starts_with(b"xref")) {
        return Err(invalid(format!("startxref {} does not point at xref", xref_offset)));
    }

    let section = String::from_utf8_lossy(&data[xref_offset..]);
    let mut lines = section.lines();
    lines.next(); // "xref"
    let subsection = lines
        .next()
        .ok_or_else(|| invalid("truncated xref table"))?;
    let entry_count = parse_subsection(subsection)?;

    let mut offsets = Vec::with_capacity(entry_count.saturating_sub(1));
    for number in 0..entry_count {
        let entry = lines
            .next()
            .ok_or_else(|| invalid(format!("xref entry {} missing", number)))?;
        let (offset, kind) = parse_entry(entry)?;
        if number == 0 {
            if kind != 'f' {
                return Err(invalid("xref entry 0 must be free"));
            }
            continue;
        }
        if kind != 'n' {
            continue;
        }
        let header = format!("{} 0 obj", number);
        if !data.get(offset..).is_some_and(|rest| rest.starts_with(header.as_bytes())) {
            return Err(invalid(format!(
                "xref offset {} for object {} does not point at its header",
                offset, number
            )));
        }
        offsets.push((number, offset));
    }

    let trailer_text: String = lines.collect::<Vec<_>>().join("\n");
    let patterns = TrailerPatterns::get();
    let size = capture_number(&patterns.size, &trailer_text)
        .ok_or_else(|| invalid("trailer has no /Size"))?;
    if size != entry_count {
        return Err(invalid(format!(
            "trailer /Size {} does not match {} xref entries",
            size, entry_count
        )));
    }
    let root = capture_number(&patterns.root, &trailer_text)
        .ok_or_else(|| invalid("trailer has no /Root"))?;

    let catalog = object_body(data, &offsets, root)?;
    let pages_id = capture_number(&patterns.pages, &catalog)
        .ok_or_else(|| invalid("catalog has no /Pages reference"))?;
    let pages = object_body(data, &offsets, pages_id)?;
    let page_count = capture_number(&patterns.count, &pages)
        .ok_or_else(|| invalid("pages node has no /Count"))?;

    Ok(PdfSummary {
        version,
        object_count: offsets.len(),
        page_count,
        root,
        xref_offset,
    })
}

/// Check if bytes form a structurally valid PDF.
pub fn is_valid_pdf(data: &[u8]) -> bool {
    inspect_pdf(data).is_ok()
}

fn header_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(invalid("missing %PDF- header"));
    }
    let version = String::from_utf8_lossy(&data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN])
        .to_string();
    if !is_valid_version(&version) {
        return Err(invalid(format!("unsupported version {:?}", version)));
    }
    Ok(version)
}

/// Check if a version string looks like "1.4".
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

fn trim_end(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &data[..end]
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn startxref_value(tail: &[u8]) -> Result<usize> {
    let pos = rfind(tail, STARTXREF).ok_or_else(|| invalid("missing startxref"))?;
    let rest = String::from_utf8_lossy(&tail[pos + STARTXREF.len()..]);
    rest.split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| invalid("startxref has no offset"))
}

fn parse_subsection(line: &str) -> Result<usize> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next().and_then(|c| c.parse().ok())) {
        (Some("0"), Some(count)) => Ok(count),
        _ => Err(invalid(format!("unexpected xref subsection {:?}", line))),
    }
}

fn parse_entry(entry: &str) -> Result<(usize, char)> {
    let mut parts = entry.split_whitespace();
    let offset = parts.next().and_then(|o| o.parse().ok());
    let _generation = parts.next();
    let kind = parts.next().and_then(|k| k.chars().next());
    match (offset, kind) {
        (Some(offset), Some(kind @ ('n' | 'f'))) => Ok((offset, kind)),
        _ => Err(invalid(format!("malformed xref entry {:?}", entry))),
    }
}

fn object_body(data: &[u8], offsets: &[(usize, usize)], number: usize) -> Result<String> {
    let offset = offsets
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, o)| *o)
        .ok_or_else(|| invalid(format!("object {} is not in the xref table", number)))?;
    let rest = &data[offset..];
    let end = rest
        .windows(b"endobj".len())
        .position(|w| w == b"endobj")
        .ok_or_else(|| invalid(format!("object {} has no endobj", number)))?;
    Ok(String::from_utf8_lossy(&rest[..end]).into_owned())
}

fn capture_number(pattern: &Regex, text: &str) -> Option<usize> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
