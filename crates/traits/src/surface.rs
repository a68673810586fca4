//! PageSurface trait for abstracting the drawing/annotation sink.
//!
//! The orchestrator forwards finished placements here; the engine itself
//! never draws. A surface belongs to a single page and is consumed when the
//! page is materialized, so resource lifetime stays with the caller.

use thiserror::Error;
use toclink_types::Rect;

use crate::measure::FontSpec;

/// Error type for surface operations.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Destination page {0} does not exist in the target document.")]
    BadDestination(usize),

    #[error("Content stream error: {0}")]
    Content(String),
}

/// A drawing surface for a single page.
pub trait PageSurface {
    /// Renders `text` into `rect` on the page.
    fn draw_text(&mut self, text: &str, font: &FontSpec, rect: Rect) -> Result<(), SurfaceError>;

    /// Registers a clickable region linking to a 1-based page index.
    /// `margin_x`/`margin_y` widen the hit-test area around `rect`.
    fn add_link(
        &mut self,
        rect: Rect,
        destination: usize,
        margin_x: f32,
        margin_y: f32,
    ) -> Result<(), SurfaceError>;
}
