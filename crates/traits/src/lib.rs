pub mod measure;
pub mod surface;

pub use measure::{FontSpec, MeasureError, TextMeasurer};
pub use surface::{PageSurface, SurfaceError};
