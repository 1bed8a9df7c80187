//! Block layout with manual pagination.

use crate::model::{Block, DrawCommand, FontKind, ListItem, Page};
use crate::parser::strip_inline_markdown;

use super::text::{estimate_text_width, wrap_text};
use super::{LayoutOptions, PageGeometry};

/// Line height as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.35;

const BODY_SIZE: f64 = 12.0;
const CODE_SIZE: f64 = 10.0;

const LIST_INDENT: f64 = 18.0;
const CODE_INDENT: f64 = 16.0;
const CODE_LABEL_INDENT: f64 = 8.0;

const BLANK_GAP: f64 = 6.0;
const MAJOR_HEADING_GAP: f64 = 10.0;
const MINOR_HEADING_GAP: f64 = 6.0;
const PARAGRAPH_GAP: f64 = 8.0;
const LIST_ITEM_GAP: f64 = 2.0;
const LIST_GAP: f64 = 6.0;
const CODE_GAP: f64 = 8.0;

/// Font size for a heading level.
pub fn heading_size(level: u8) -> f64 {
    match level {
        1 => 28.0,
        2 => 22.0,
        3 => 18.0,
        4 => 15.0,
        5 => 13.0,
        _ => 12.0,
    }
}

/// Lay out blocks on US Letter pages.
///
/// Always returns at least one page; a document with nothing to draw
/// yields a single page holding one space character.
pub fn layout(blocks: &[Block]) -> Vec<Page> {
    layout_with_options(blocks, &LayoutOptions::default())
}

/// Lay out blocks with custom options.
pub fn layout_with_options(blocks: &[Block], options: &LayoutOptions) -> Vec<Page> {
    let mut engine = LayoutEngine::new(options.geometry);
    for block in blocks {
        engine.render_block(block);
    }
    let pages = engine.finish();
    log::debug!("laid out {} blocks on {} pages", blocks.len(), pages.len());
    pages
}

/// Cursor-driven layout state.
///
/// Only the last page is ever written to; starting a new page freezes the
/// previous one.
pub struct LayoutEngine {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f64,
}

impl LayoutEngine {
    /// Create an engine positioned at the top of an empty first page.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::new()],
            y: geometry.top_y(),
        }
    }

    /// Current baseline position.
    pub fn cursor_y(&self) -> f64 {
        self.y
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Render one block at the cursor.
    pub fn render_block(&mut self, block: &Block) {
        match block {
            Block::Blank => self.add_spacing(BLANK_GAP),
            Block::Heading { level, text } => {
                self.render_wrapped(text, FontKind::Bold, heading_size(*level), 0.0);
                let gap = if *level <= 2 {
                    MAJOR_HEADING_GAP
                } else {
                    MINOR_HEADING_GAP
                };
                self.add_spacing(gap);
            }
            Block::Paragraph { text } => {
                self.render_wrapped(text, FontKind::Regular, BODY_SIZE, 0.0);
                self.add_spacing(PARAGRAPH_GAP);
            }
            Block::List { items } => {
                for item in items {
                    self.render_list_item(item);
                    self.add_spacing(LIST_ITEM_GAP);
                }
                self.add_spacing(LIST_GAP);
            }
            Block::Code { language, lines } => {
                self.render_code(language, lines);
                self.add_spacing(CODE_GAP);
            }
        }
    }

    /// Consume the engine and return its pages.
    pub fn finish(self) -> Vec<Page> {
        if self.pages.iter().all(Page::is_empty) {
            let mut page = Page::new();
            page.push(DrawCommand::new(
                FontKind::Regular,
                BODY_SIZE,
                self.geometry.margin_left,
                self.geometry.top_y(),
                " ",
            ));
            return vec![page];
        }
        self.pages
    }

    fn render_wrapped(&mut self, text: &str, font: FontKind, size: f64, indent: f64) {
        let max_width = self.geometry.content_width() - indent;
        let plain = strip_inline_markdown(text);
        for line in wrap_text(&plain, max_width, size, font.is_mono()) {
            self.draw_line(line, font, size, indent);
        }
    }

    fn render_list_item(&mut self, item: &ListItem) {
        let marker = item.marker();
        let marker_width = estimate_text_width(&marker, BODY_SIZE, false);
        let max_width = self.geometry.content_width() - LIST_INDENT - marker_width;
        let plain = strip_inline_markdown(&item.text);

        let mut lines = wrap_text(&plain, max_width, BODY_SIZE, false).into_iter();
        if let Some(first) = lines.next() {
            self.draw_line(format!("{}{}", marker, first), FontKind::Regular, BODY_SIZE, LIST_INDENT);
        }
        for line in lines {
            self.draw_line(line, FontKind::Regular, BODY_SIZE, LIST_INDENT + marker_width);
        }
    }

    fn render_code(&mut self, language: &str, lines: &[String]) {
        if !language.is_empty() {
            self.draw_line(
                format!("Code ({}):", language),
                FontKind::Bold,
                CODE_SIZE,
                CODE_LABEL_INDENT,
            );
        }
        let max_width = self.geometry.content_width() - CODE_INDENT;
        for code_line in lines {
            for segment in wrap_text(code_line, max_width, CODE_SIZE, true) {
                self.draw_line(segment, FontKind::Mono, CODE_SIZE, CODE_INDENT);
            }
        }
    }

    fn draw_line(&mut self, text: String, font: FontKind, size: f64, indent: f64) {
        let line_height = size * LINE_HEIGHT_FACTOR;
        self.ensure_space(line_height);
        let command = DrawCommand::new(font, size, self.geometry.margin_left + indent, self.y, text);
        self.current_page().push(command);
        self.y -= line_height;
    }

    fn add_spacing(&mut self, gap: f64) {
        self.ensure_space(gap);
        self.y -= gap;
    }

    fn ensure_space(&mut self, needed: f64) {
        if self.y - needed < self.geometry.margin_bottom {
            self.pages.push(Page::new());
            self.y = self.geometry.top_y();
        }
    }

    fn current_page(&mut self) -> &mut Page {
        // `pages` starts non-empty and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}
