//! Width estimation and greedy word wrapping.
//!
//! No font metrics are consulted. Every character is assumed to be a fixed
//! fraction of the font size wide, which decides every wrap point.

/// Average glyph width as a fraction of font size for proportional fonts.
pub const PROPORTIONAL_WIDTH_FACTOR: f64 = 0.52;

/// Glyph width as a fraction of font size for monospace fonts.
pub const MONO_WIDTH_FACTOR: f64 = 0.6;

/// Estimate the rendered width of `text` in points.
pub fn estimate_text_width(text: &str, font_size: f64, mono: bool) -> f64 {
    let factor = if mono {
        MONO_WIDTH_FACTOR
    } else {
        PROPORTIONAL_WIDTH_FACTOR
    };
    text.chars().count() as f64 * font_size * factor
}

/// Greedily wrap `text` into lines no wider than `max_width`.
///
/// Whitespace runs collapse to single spaces. A word wider than `max_width`
/// is broken between characters; a lone character that still does not fit
/// is emitted on its own. Always returns at least one line.
///
/// # Example
///
/// ```
/// use mdpdf::layout::wrap_text;
///
/// let lines = wrap_text("aaaa bbbb", 30.0, 10.0, true);
/// assert_eq!(lines, vec!["aaaa", "bbbb"]);
/// assert_eq!(wrap_text("   ", 30.0, 10.0, true), vec![""]);
/// ```
pub fn wrap_text(text: &str, max_width: f64, font_size: f64, mono: bool) -> Vec<String> {
    let fits = |s: &str| estimate_text_width(s, font_size, mono) <= max_width;

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if fits(word) {
            current = word.to_string();
            continue;
        }

        let mut chunk = String::new();
        for ch in word.chars() {
            chunk.push(ch);
            if !fits(&chunk) {
                chunk.pop();
                if !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(ch);
            }
        }
        current = chunk;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_width_factors() {
        assert!((estimate_text_width("abcd", 10.0, true) - 24.0).abs() < 1e-4);
        assert!((estimate_text_width("abcd", 10.0, false) - 20.8).abs() < 1e-4);
        assert_eq!(estimate_text_width("", 12.0, false), 0.0);
    }

    #[test]
    fn test_estimate_width_counts_chars_not_bytes() {
        assert_eq!(
            estimate_text_width("héllo", 10.0, true),
            estimate_text_width("hello", 10.0, true)
        );
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let lines = wrap_text("  hello \t  world  ", 1000.0, 12.0, false);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn test_wrap_empty_input() {
        assert_eq!(wrap_text("", 100.0, 12.0, false), vec![""]);
        assert_eq!(wrap_text(" \n ", 100.0, 12.0, false), vec![""]);
    }

    #[test]
    fn test_wrap_greedy_fill() {
        // 6pt per char in mono at size 10: 5 chars fit in 30pt.
        let lines = wrap_text("ab cd ef gh", 30.0, 10.0, true);
        assert_eq!(lines, vec!["ab cd", "ef gh"]);
    }

    #[test]
    fn test_wrap_hard_breaks_long_word() {
        let lines = wrap_text("abcdefghijkl", 30.0, 10.0, true);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
        for line in &lines {
            assert!(estimate_text_width(line, 10.0, true) <= 30.0);
        }
    }

    #[test]
    fn test_wrap_tail_chunk_joins_next_word() {
        let lines = wrap_text("abcdefg h", 30.0, 10.0, true);
        assert_eq!(lines, vec!["abcde", "fg h"]);
    }

    #[test]
    fn test_wrap_single_char_wider_than_limit() {
        let lines = wrap_text("abc", 3.0, 10.0, true);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
