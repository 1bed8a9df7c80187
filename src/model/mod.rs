//! Data model shared by the conversion stages.
//!
//! Blocks are the parser's output and the layout engine's input; pages of
//! draw commands are the layout engine's output and the PDF writer's input.
//! Neither stage sees the other's internals.

mod block;
mod page;

pub use block::{Block, ListItem};
pub use page::{DrawCommand, FontKind, Page};
