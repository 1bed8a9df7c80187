//! Page geometry and layout configuration.

/// Page size and margins in points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
    /// Top margin
    pub margin_top: f64,
    /// Bottom margin
    pub margin_bottom: f64,
    /// Left margin
    pub margin_left: f64,
    /// Right margin
    pub margin_right: f64,
}

impl PageGeometry {
    /// US Letter (8.5 x 11 inches) with 64pt margins.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// A4 (210 x 297 mm) with 64pt margins.
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Create a geometry with uniform 64pt margins.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_top: 64.0,
            margin_bottom: 64.0,
            margin_left: 64.0,
            margin_right: 64.0,
        }
    }

    /// Set all four margins to the same value.
    pub fn with_margins(mut self, margin: f64) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Width available for text between the side margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Baseline of the first line on a fresh page.
    pub fn top_y(&self) -> f64 {
        self.height - self.margin_top
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Options for the layout engine.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    /// Page size and margins
    pub geometry: PageGeometry,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_geometry() {
        let g = PageGeometry::letter();
        assert_eq!(g.content_width(), 484.0);
        assert_eq!(g.top_y(), 728.0);
        assert_eq!(g, PageGeometry::default());
    }

    #[test]
    fn test_custom_margins() {
        let g = PageGeometry::a4().with_margins(72.0);
        assert_eq!(g.content_width(), 451.0);
        assert_eq!(g.top_y(), 770.0);
    }

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new().with_geometry(PageGeometry::a4());
        assert_eq!(options.geometry.width, 595.0);
    }
}
