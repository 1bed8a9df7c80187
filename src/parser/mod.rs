//! Markdown parsing module.

mod block_parser;
mod inline;

pub use block_parser::{parse_blocks, BlockParser};
pub use inline::strip_inline_markdown;
