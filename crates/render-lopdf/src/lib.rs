//! lopdf rendering adapter for the TOC layout engine.
//!
//! Two halves: `FaceMeasurer` implements the injected measurement
//! capability over raw font data, and `TocPageRenderer` implements the
//! drawing surface, turning placements into a content stream plus link
//! annotations ready for `toclink_composer::Assembler::prepend_page`.
//!
//! All coordinate-space conversion between the engine's world units and
//! PDF page space (including the y-flip) happens here; the engine never
//! sees page units.

mod measurer;
mod renderer;

pub use measurer::FaceMeasurer;
pub use renderer::TocPageRenderer;
