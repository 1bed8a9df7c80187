//! Page-level types produced by the layout engine.

use serde::{Deserialize, Serialize};

/// Font selector for a draw command.
///
/// The three variants map onto the standard Type1 fonts registered by the
/// PDF writer under fixed resource aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontKind {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
    /// Courier
    Mono,
}

impl FontKind {
    /// All fonts in resource order (F1, F2, F3).
    pub const ALL: [FontKind; 3] = [FontKind::Regular, FontKind::Bold, FontKind::Mono];

    /// Resource alias used inside content streams.
    pub fn alias(self) -> &'static str {
        match self {
            FontKind::Regular => "F1",
            FontKind::Bold => "F2",
            FontKind::Mono => "F3",
        }
    }

    /// PostScript name of the standard font.
    pub fn base_font(self) -> &'static str {
        match self {
            FontKind::Regular => "Helvetica",
            FontKind::Bold => "Helvetica-Bold",
            FontKind::Mono => "Courier",
        }
    }

    /// Whether width estimation should use the monospace factor.
    pub fn is_mono(self) -> bool {
        matches!(self, FontKind::Mono)
    }
}

/// One line of text placed at an absolute page position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    /// Font to draw with
    pub font: FontKind,

    /// Font size in points
    pub size: f64,

    /// Baseline x position in points
    pub x: f64,

    /// Baseline y position in points (origin at bottom-left)
    pub y: f64,

    /// Unescaped line text
    pub text: String,
}

impl DrawCommand {
    /// Create a new draw command.
    pub fn new(font: FontKind, size: f64, x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            font,
            size,
            x,
            y,
            text: text.into(),
        }
    }
}

/// An ordered list of draw commands for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Commands in drawing order
    pub commands: Vec<DrawCommand>,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a draw command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Check if the page has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands on the page.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Iterate over commands in drawing order.
    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Plain text of the page, one drawn line per text line.
    pub fn plain_text(&self) -> String {
        self.commands
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_aliases() {
        let aliases: Vec<_> = FontKind::ALL.iter().map(|f| f.alias()).collect();
        assert_eq!(aliases, vec!["F1", "F2", "F3"]);
        assert_eq!(FontKind::Bold.base_font(), "Helvetica-Bold");
        assert!(FontKind::Mono.is_mono());
        assert!(!FontKind::Regular.is_mono());
    }

    #[test]
    fn test_page_push() {
        let mut page = Page::new();
        assert!(page.is_empty());
        page.push(DrawCommand::new(FontKind::Regular, 12.0, 64.0, 728.0, "a"));
        page.push(DrawCommand::new(FontKind::Bold, 12.0, 64.0, 711.8, "b"));
        assert_eq!(page.len(), 2);
        assert_eq!(page.plain_text(), "a\nb");
    }
}
