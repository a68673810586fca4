pub mod entry;
pub mod geometry;
pub mod units;

pub use entry::TocEntry;
pub use geometry::{GeometryError, PageGeometry, Rect, Size};
pub use units::UnitScale;
