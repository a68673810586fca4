//! The TOC layout engine.
//!
//! A pure pipeline: given page geometry, options, and an injected text
//! measurer, it turns an ordered list of entries into draw/link placements.
//! It holds no state between calls and performs no I/O, so the same inputs
//! always produce the same placements.

use log::debug;
use toclink_traits::{FontSpec, MeasureError, TextMeasurer};
use toclink_types::{PageGeometry, Rect, TocEntry};

use crate::{LayoutError, LayoutOptions};

/// Empirical slack added to measured widths. Text does not quite fit the
/// exact box reported by measurement, so every placed box is widened by
/// this much before clamping. A tuned fudge factor, kept as-is.
pub const WIDTH_SLACK: f32 = 0.1;

/// A clickable destination attached to a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkTarget {
    /// 1-based page index in the final document.
    pub page: usize,
    pub margin_x: f32,
    pub margin_y: f32,
}

/// One placed piece of text: what to draw, where, and whether it links.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub font: FontSpec,
    pub rect: Rect,
    pub link: Option<LinkTarget>,
}

/// A placed row: the description cell and, when the entry has any
/// right-column text, the page-number cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub description: PlacedText,
    pub number: Option<PlacedText>,
}

/// Configured layout for one TOC page. Immutable once built.
#[derive(Debug, Clone)]
pub struct TocLayout {
    options: LayoutOptions,
    description_x: f32,
    page_number_x: f32,
    max_description_width: f32,
}

impl TocLayout {
    /// Derives the column positions from the page geometry and options.
    ///
    /// Fails with `LayoutError::InvalidConfig` when the margins, padding,
    /// and page-number column leave no room for the description column.
    pub fn new(page: PageGeometry, options: LayoutOptions) -> Result<Self, LayoutError> {
        let description_x = page.left() + options.left_margin;
        let page_number_x = page.right() - options.page_number_width - options.right_margin;
        let max_description_width = page_number_x - description_x - options.padding;

        if max_description_width <= 0.0 {
            return Err(LayoutError::InvalidConfig(max_description_width));
        }

        debug!(
            "TOC columns: description at {:.1} (max {:.1}), page numbers at {:.1}",
            description_x, max_description_width, page_number_x
        );

        Ok(Self {
            options,
            description_x,
            page_number_x,
            max_description_width,
        })
    }

    pub fn description_x(&self) -> f32 {
        self.description_x
    }

    pub fn page_number_x(&self) -> f32 {
        self.page_number_x
    }

    pub fn max_description_width(&self) -> f32 {
        self.max_description_width
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Places a single piece of text in a column.
    ///
    /// The measured width is widened by `WIDTH_SLACK`, clamped to the
    /// column, and right-aligned text is shifted so its right edge meets
    /// the column's right boundary. A link is attached iff `destination`
    /// is present.
    #[allow(clippy::too_many_arguments)]
    pub fn place_entry(
        &self,
        measurer: &dyn TextMeasurer,
        font: &FontSpec,
        destination: Option<usize>,
        text: &str,
        column_x: f32,
        baseline_y: f32,
        max_column_width: f32,
        align_right: bool,
    ) -> Result<PlacedText, LayoutError> {
        let extent = measurer.measure(text, font)?;
        if !extent.width.is_finite()
            || !extent.height.is_finite()
            || extent.width < 0.0
            || extent.height < 0.0
        {
            return Err(MeasureError::InvalidExtent {
                text: text.to_string(),
                width: extent.width,
                height: extent.height,
            }
            .into());
        }

        let width = (extent.width + WIDTH_SLACK).min(max_column_width);
        let x = if align_right {
            column_x + max_column_width - width
        } else {
            column_x
        };

        let rect = Rect::new(x, baseline_y, width, extent.height.ceil());
        let link = destination.map(|page| LinkTarget {
            page,
            margin_x: self.options.link_margin_x,
            margin_y: self.options.link_margin_y,
        });

        Ok(PlacedText {
            text: text.to_string(),
            font: font.clone(),
            rect,
            link,
        })
    }

    /// Lays out all entries in order, top to bottom.
    ///
    /// Each row advances the baseline by `y_increment`; heading rows add
    /// `heading_gap` on top. The description cell is left-aligned, the
    /// page-number cell right-aligned and clickable when the entry has a
    /// destination. Text wider than its column is clipped by the clamped
    /// box, never wrapped.
    pub fn layout_table(
        &self,
        entries: &[TocEntry],
        measurer: &dyn TextMeasurer,
        heading_font: &FontSpec,
        entry_font: &FontSpec,
    ) -> Result<Vec<PlacedRow>, LayoutError> {
        let mut y = self.options.top_offset;
        let mut rows = Vec::with_capacity(entries.len());

        for entry in entries {
            let font = if entry.is_heading() {
                heading_font
            } else {
                entry_font
            };

            let description = self.place_entry(
                measurer,
                font,
                entry.destination,
                entry.display_label(),
                self.description_x,
                y,
                self.max_description_width,
                false,
            )?;

            let number_text = entry.number_text();
            let number = if number_text.is_empty() {
                None
            } else {
                Some(self.place_entry(
                    measurer,
                    font,
                    entry.destination,
                    &number_text,
                    self.page_number_x,
                    y,
                    self.options.page_number_width,
                    true,
                )?)
            };

            rows.push(PlacedRow {
                description,
                number,
            });

            y += self.options.y_increment;
            if entry.is_heading() {
                y += self.options.heading_gap;
            }
        }

        debug!("Laid out {} TOC rows", rows.len());
        Ok(rows)
    }
}
