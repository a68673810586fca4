/// Layout options for the TOC page, all in world units.
///
/// Geometry handed to `TocLayout::new` must already be converted to world
/// units (see `toclink_types::UnitScale`); the engine itself is
/// unit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Gap between the page's left edge and the description column.
    pub left_margin: f32,
    /// Gap between the page-number column and the page's right edge.
    pub right_margin: f32,
    /// Baseline of the first row.
    pub top_offset: f32,
    /// Vertical advance after every row.
    pub y_increment: f32,
    /// Extra vertical advance after a heading row.
    pub heading_gap: f32,
    /// Horizontal gap between the description and page-number columns.
    pub padding: f32,
    /// Width reserved for the page-number column.
    pub page_number_width: f32,
    /// Horizontal hit-test tolerance added around link rectangles.
    pub link_margin_x: f32,
    /// Vertical hit-test tolerance added around link rectangles.
    pub link_margin_y: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            left_margin: 30.0,
            right_margin: 30.0,
            top_offset: 150.0,
            y_increment: 40.0,
            heading_gap: 10.0,
            padding: 20.0,
            page_number_width: 100.0,
            link_margin_x: 0.0,
            link_margin_y: 0.0,
        }
    }
}
