//! Block-level types produced by the Markdown parser.

use serde::{Deserialize, Serialize};

/// One semantic unit of parsed Markdown.
///
/// Blocks are produced top-to-bottom by [`crate::parser::parse_blocks`] and
/// consumed once, in order, by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A blank line, used only for vertical spacing
    Blank,

    /// An ATX heading
    Heading {
        /// Heading level (1-6)
        #[serde(deserialize_with = "heading_level")]
        level: u8,
        /// Raw heading text, inline markdown kept
        text: String,
    },

    /// Consecutive text lines joined with single spaces
    Paragraph {
        /// Joined paragraph text
        text: String,
    },

    /// A flat run of list items sharing one marker style
    List {
        /// Items in source order
        items: Vec<ListItem>,
    },

    /// A fenced code block
    Code {
        /// Language tag from the opening fence (empty if none)
        language: String,
        /// Raw lines with tabs expanded
        lines: Vec<String>,
    },
}

impl Block {
    /// Create a heading block.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Create a code block.
    pub fn code(language: impl Into<String>, lines: Vec<String>) -> Self {
        Block::Code {
            language: language.into(),
            lines,
        }
    }

    /// Check if this block is a blank line.
    pub fn is_blank(&self) -> bool {
        matches!(self, Block::Blank)
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Block::List { .. })
    }

    /// Check if this block is a code block.
    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code { .. })
    }
}

/// A single list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Whether the item came from a numbered marker
    pub ordered: bool,

    /// Literal number from the source (ordered items only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,

    /// Item text, inline markdown kept
    pub text: String,
}

impl ListItem {
    /// Create an unordered (bullet) item.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            ordered: false,
            index: None,
            text: text.into(),
        }
    }

    /// Create an ordered item carrying its source number.
    pub fn numbered(index: u64, text: impl Into<String>) -> Self {
        Self {
            ordered: true,
            index: Some(index),
            text: text.into(),
        }
    }

    /// Marker drawn in front of the first wrapped line.
    pub fn marker(&self) -> String {
        match (self.ordered, self.index) {
            (true, Some(index)) => format!("{}. ", index),
            _ => "- ".to_string(),
        }
    }
}

/// Reject heading levels the parser can never produce.
fn heading_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let level = u8::deserialize(deserializer)?;
    if (1..=6).contains(&level) {
        Ok(level)
    } else {
        Err(serde::de::Error::custom(format!(
            "heading level {} out of range 1-6",
            level
        )))
    }
}
