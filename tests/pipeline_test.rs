//! Integration tests for the parse, layout and serialize pipeline.

use mdpdf::layout::{wrap_text, LINE_HEIGHT_FACTOR};
use mdpdf::{
    convert_str, inspect_pdf, layout, parse_blocks, serialize, Block, FontKind, ListItem,
    PageGeometry,
};

fn pdf_text(markdown: &str) -> String {
    String::from_utf8(convert_str(markdown).unwrap()).unwrap()
}

// ==================== Scenarios ====================

#[test]
fn test_heading_and_paragraph_document() {
    let markdown = "# Title\n\nHello world.\n";
    let blocks = parse_blocks(markdown);
    assert_eq!(
        blocks,
        vec![
            Block::heading(1, "Title"),
            Block::Blank,
            Block::paragraph("Hello world."),
        ]
    );

    let pages = layout(&blocks);
    assert_eq!(pages.len(), 1);

    let text = pdf_text(markdown);
    assert_eq!(text.matches(" Tj ET").count(), 2);
    assert!(text.contains("BT /F2 28.00 Tf 1 0 0 1 64.00 728.00 Tm (Title) Tj ET"));
    assert!(text.contains("/F1 12.00 Tf"));
    assert!(text.contains("(Hello world.) Tj ET"));
}

#[test]
fn test_fenced_code_block() {
    let blocks = parse_blocks("```js\nconst x = 1;\n```");
    assert_eq!(blocks, vec![Block::code("js", vec!["const x = 1;".to_string()])]);

    let pages = layout(&blocks);
    let cmds = &pages[0].commands;
    assert_eq!(cmds.len(), 2);
    assert_eq!(cmds[0].font, FontKind::Bold);
    assert_eq!(cmds[0].size, 10.0);
    assert_eq!(cmds[1].font, FontKind::Mono);
    assert_eq!(cmds[1].size, 10.0);
    assert_eq!(cmds[1].x - cmds[0].x, 8.0);
    assert_eq!(cmds[1].x, 64.0 + 16.0);
}

#[test]
fn test_list_style_switch() {
    let blocks = parse_blocks("- a\n- b\n1. c\n");
    assert_eq!(
        blocks,
        vec![
            Block::List {
                items: vec![ListItem::bullet("a"), ListItem::bullet("b")],
            },
            Block::List {
                items: vec![ListItem::numbered(1, "c")],
            },
        ]
    );

    let pages = layout(&blocks);
    let texts: Vec<&str> = pages[0].iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["- a", "- b", "1. c"]);
}

#[test]
fn test_empty_input() {
    let blocks = parse_blocks("");
    assert_eq!(blocks, vec![Block::Blank]);

    let pages = layout(&blocks);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].len(), 1);
    assert_eq!(pages[0].commands[0].text, " ");

    let summary = inspect_pdf(&serialize(&pages).unwrap()).unwrap();
    assert_eq!(summary.page_count, 1);
}

#[test]
fn test_long_paragraph_splits_between_lines() {
    let words: Vec<String> = (0..1200).map(|i| format!("word{}", i)).collect();
    let paragraph = words.join(" ");
    let blocks = parse_blocks(&paragraph);
    assert_eq!(blocks.len(), 1);

    let geometry = PageGeometry::letter();
    let pages = layout(&blocks);
    assert!(pages.len() >= 2);

    let line_height = 12.0 * LINE_HEIGHT_FACTOR;
    for page in &pages {
        for cmd in page.iter() {
            assert!(cmd.y - line_height >= geometry.margin_bottom - 1e-9);
            assert!(cmd.y <= geometry.top_y());
        }
    }

    // Every wrapped line lands whole on exactly one page.
    let expected = wrap_text(&paragraph, geometry.content_width(), 12.0, false);
    let drawn: Vec<String> = pages
        .iter()
        .flat_map(|p| p.iter().map(|c| c.text.clone()))
        .collect();
    assert_eq!(drawn, expected);
    assert_eq!(pages[1].commands[0].y, geometry.top_y());
}

// ==================== Properties ====================

#[test]
fn test_determinism() {
    let markdown = "# Doc\n\nSome *text* with (parens) and \\ slashes.\n\n- x\n- y\n\n```\ncode\n```\n";
    assert_eq!(convert_str(markdown).unwrap(), convert_str(markdown).unwrap());
}

#[test]
fn test_totality_on_odd_inputs() {
    let inputs = [
        "",
        "   \n\t\n",
        "```rust\nfn main() {}\n",
        "####### seven hashes",
        "1.",
        "-",
        "\r\n\r\n",
        "((((\\\\))))",
        "ünïcödé ✓ テキスト",
    ];
    for input in inputs {
        let bytes = convert_str(input).unwrap();
        assert!(inspect_pdf(&bytes).is_ok(), "invalid PDF for {:?}", input);
    }
}

#[test]
fn test_unterminated_fence_consumes_rest() {
    let blocks = parse_blocks("```\nline one\n# not a heading\n");
    assert_eq!(
        blocks,
        vec![Block::code(
            "",
            vec!["line one".to_string(), "# not a heading".to_string()]
        )]
    );
}

#[test]
fn test_wrapped_lines_fit_content_width() {
    let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod \
                tempor incididunt ut labore et dolore magna aliqua";
    for line in wrap_text(text, 120.0, 12.0, false) {
        assert!(mdpdf::layout::estimate_text_width(&line, 12.0, false) <= 120.0);
    }
}

#[test]
fn test_structural_validity() {
    let markdown = (1..=80)
        .map(|i| format!("## Heading {}\n\nParagraph {}.\n", i, i))
        .collect::<Vec<_>>()
        .join("\n");
    let bytes = convert_str(&markdown).unwrap();
    let summary = inspect_pdf(&bytes).unwrap();

    let pages = layout(&parse_blocks(&markdown));
    assert!(pages.len() > 1);
    assert_eq!(summary.page_count, pages.len());
    assert_eq!(summary.object_count, 3 + 2 * pages.len() + 2);
    assert_eq!(summary.root, summary.object_count);
    assert!(bytes.starts_with(b"%PDF-1.4\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));
}

#[test]
fn test_special_characters_escaped() {
    let text = pdf_text("Use f(x) with C:\\path");
    assert!(text.contains("(Use f\\(x\\) with C:\\\\path) Tj"));
}
