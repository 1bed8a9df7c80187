//! Page layout: text measurement, wrapping and pagination.

mod engine;
mod geometry;
mod text;

pub use engine::{heading_size, layout, layout_with_options, LayoutEngine, LINE_HEIGHT_FACTOR};
pub use geometry::{LayoutOptions, PageGeometry};
pub use text::{estimate_text_width, wrap_text, MONO_WIDTH_FACTOR, PROPORTIONAL_WIDTH_FACTOR};
