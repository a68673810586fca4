use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(
        "Description column width {0:.2} is not positive; widen the page or shrink the margins/page-number column."
    )]
    InvalidConfig(f32),
    #[error("Text measurement failed: {0}")]
    Measurement(#[from] toclink_traits::MeasureError),
}

pub mod config;
pub mod engine;

pub use self::config::LayoutOptions;
pub use self::engine::{LinkTarget, PlacedRow, PlacedText, TocLayout};

// Re-export geometry types used across the layout API to prevent type
// mismatches downstream.
pub use toclink_types::{PageGeometry, Rect, Size, TocEntry};

#[cfg(test)]
mod test_utils;
