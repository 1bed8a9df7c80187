//! Inline Markdown stripping applied before text is wrapped.

use regex::Regex;
use std::sync::OnceLock;

/// Compiled inline patterns, applied in declaration order.
struct InlinePatterns {
    image: Regex,
    link: Regex,
    code: Regex,
    strong_star: Regex,
    strong_underscore: Regex,
    emphasis_star: Regex,
    emphasis_underscore: Regex,
    strikethrough: Regex,
}

impl InlinePatterns {
    fn get() -> &'static Self {
        static PATTERNS: OnceLock<InlinePatterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Self {
            image: Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap(),
            link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
            code: Regex::new(r"`([^`]+)`").unwrap(),
            strong_star: Regex::new(r"\*\*([^*]+)\*\*").unwrap(),
            strong_underscore: Regex::new(r"__([^_]+)__").unwrap(),
            emphasis_star: Regex::new(r"\*([^*]+)\*").unwrap(),
            emphasis_underscore: Regex::new(r"_([^_]+)_").unwrap(),
            strikethrough: Regex::new(r"~~([^~]+)~~").unwrap(),
        })
    }
}

/// Rewrite inline markdown into plain text.
///
/// Images become `[image: alt]`, links become `text (url)`, and code spans,
/// bold, italic and strikethrough collapse to their inner text. Images are
/// rewritten before links and bold before italic so that nested markers are
/// consumed by the outer construct first.
///
/// # Example
///
/// ```
/// use mdpdf::parser::strip_inline_markdown;
///
/// let text = strip_inline_markdown("See **[docs](https://x.dev)** and `cfg`");
/// assert_eq!(text, "See docs (https://x.dev) and cfg");
/// ```
pub fn strip_inline_markdown(text: &str) -> String {
    let p = InlinePatterns::get();

    let text = p.image.replace_all(text, "[image: ${1}]");
    let text = p.link.replace_all(&text, "${1} (${2})");
    let text = p.code.replace_all(&text, "${1}");
    let text = p.strong_star.replace_all(&text, "${1}");
    let text = p.strong_underscore.replace_all(&text, "${1}");
    let text = p.emphasis_star.replace_all(&text, "${1}");
    let text = p.emphasis_underscore.replace_all(&text, "${1}");
    let text = p.strikethrough.replace_all(&text, "${1}");

    text.into_owned()
}
