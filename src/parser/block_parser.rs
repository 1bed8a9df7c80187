//! Line-oriented block parser for the supported Markdown subset.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{Block, ListItem};

/// Line classification patterns.
struct LinePatterns {
    fence_open: Regex,
    heading: Regex,
    bullet: Regex,
    ordered: Regex,
}

impl LinePatterns {
    fn get() -> &'static Self {
        static PATTERNS: OnceLock<LinePatterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Self {
            fence_open: Regex::new(r"^```([A-Za-z0-9_-]+)?\s*$").unwrap(),
            heading: Regex::new(r"^(#{1,6})\s+(.*)$").unwrap(),
            bullet: Regex::new(r"^\s*[-*+]\s+(.*)$").unwrap(),
            ordered: Regex::new(r"^\s*([0-9]+)\.\s+(.*)$").unwrap(),
        })
    }

    /// Whether a line would start a non-paragraph block.
    fn interrupts_paragraph(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || is_fence(trimmed)
            || self.heading.is_match(line)
            || self.bullet.is_match(line)
            || self.ordered.is_match(line)
    }
}

const FENCE: &str = "```";
const TAB_EXPANSION: &str = "    ";

fn is_fence(trimmed: &str) -> bool {
    trimmed.starts_with(FENCE)
}

/// Parse Markdown text into an ordered sequence of blocks.
///
/// This never fails: every line classifies into some block. Windows line
/// endings are normalized first, and an unterminated code fence still
/// yields a final [`Block::Code`].
///
/// # Example
///
/// ```
/// use mdpdf::model::Block;
/// use mdpdf::parser::parse_blocks;
///
/// let blocks = parse_blocks("# Title\n\nHello world.\n");
/// assert_eq!(blocks[0], Block::heading(1, "Title"));
/// assert_eq!(blocks[1], Block::Blank);
/// assert_eq!(blocks[2], Block::paragraph("Hello world."));
/// ```
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let normalized = markdown.replace("\r\n", "\n");
    // A final newline terminates the last line rather than opening a new one.
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
    let lines: Vec<&str> = body.split('\n').collect();
    let blocks = BlockParser::new(&lines).parse();
    log::debug!("parsed {} lines into {} blocks", lines.len(), blocks.len());
    blocks
}

/// Index-based cursor over an immutable slice of lines.
pub struct BlockParser<'a> {
    lines: &'a [&'a str],
    pos: usize,
    patterns: &'static LinePatterns,
}

impl<'a> BlockParser<'a> {
    /// Create a parser over pre-split lines.
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            pos: 0,
            patterns: LinePatterns::get(),
        }
    }

    /// Consume all lines and return the blocks.
    pub fn parse(mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        while let Some(block) = self.next_block() {
            blocks.push(block);
        }
        blocks
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn next_block(&mut self) -> Option<Block> {
        let line = self.peek()?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.pos += 1;
            return Some(Block::Blank);
        }

        if let Some(caps) = self.patterns.fence_open.captures(trimmed) {
            let language = caps.get(1).map_or("", |m| m.as_str()).to_string();
            self.pos += 1;
            return Some(self.parse_code(language));
        }

        if let Some(caps) = self.patterns.heading.captures(line) {
            self.pos += 1;
            return Some(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].trim().to_string(),
            });
        }

        if self.patterns.bullet.is_match(line) {
            return Some(self.parse_bullet_list());
        }

        if self.patterns.ordered.is_match(line) {
            return Some(self.parse_ordered_list());
        }

        Some(self.parse_paragraph())
    }

    /// Collect lines up to the closing fence or end of input.
    fn parse_code(&mut self, language: String) -> Block {
        let mut lines = Vec::new();
        while let Some(line) = self.peek() {
            self.pos += 1;
            if is_fence(line.trim()) {
                return Block::Code { language, lines };
            }
            lines.push(line.replace('\t', TAB_EXPANSION));
        }
        log::debug!("unterminated code fence at end of input");
        Block::Code { language, lines }
    }

    fn parse_bullet_list(&mut self) -> Block {
        let mut items = Vec::new();
        while let Some(caps) = self.peek().and_then(|l| self.patterns.bullet.captures(l)) {
            items.push(ListItem::bullet(caps[1].trim()));
            self.pos += 1;
        }
        Block::List { items }
    }

    fn parse_ordered_list(&mut self) -> Block {
        let mut items = Vec::new();
        while let Some(caps) = self.peek().and_then(|l| self.patterns.ordered.captures(l)) {
            // Digits only, so parsing fails on overflow alone.
            let index = caps[1].parse::<u64>().unwrap_or(u64::MAX);
            items.push(ListItem::numbered(index, caps[2].trim()));
            self.pos += 1;
        }
        Block::List { items }
    }

    fn parse_paragraph(&mut self) -> Block {
        let mut parts = Vec::new();
        if let Some(first) = self.peek() {
            parts.push(first.trim());
            self.pos += 1;
        }
        while let Some(line) = self.peek() {
            if self.patterns.interrupts_paragraph(line) {
                break;
            }
            parts.push(line.trim());
            self.pos += 1;
        }
        Block::Paragraph {
            text: parts.join(" "),
        }
    }
}
