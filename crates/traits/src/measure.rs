//! TextMeasurer trait for abstracting text extent measurement.
//!
//! The layout engine never touches font files or glyph tables; it asks an
//! injected measurer for the rendered extent of a string and works purely
//! with the returned numbers. Tests inject a deterministic fake.

use std::fmt::Debug;
use thiserror::Error;
use toclink_types::Size;

/// Error type for text measurement.
#[derive(Error, Debug, Clone)]
pub enum MeasureError {
    #[error("Font not available: {0}")]
    FontUnavailable(String),

    #[error("Failed to parse font data: {0}")]
    InvalidFontData(String),

    #[error("Measurement returned invalid extent {width:.2}x{height:.2} for {text:?}.")]
    InvalidExtent {
        text: String,
        width: f32,
        height: f32,
    },
}

/// A font selection passed through the engine to the measurer and carried
/// on placements for the renderer. Opaque to the layout engine itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Family or base-font name, interpreted by the measurer/renderer.
    pub name: String,
    /// Size in world units.
    pub size: f32,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// A capability for measuring the rendered extent of a string.
///
/// Implementations must return non-negative, finite dimensions in world
/// units; callers treat anything else as `MeasureError::InvalidExtent` and
/// propagate it unchanged.
pub trait TextMeasurer: Send + Sync + Debug {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<Size, MeasureError>;
}
