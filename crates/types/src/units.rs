/// Linear conversion between page units (typically PDF points) and the
/// world units the layout engine operates in.
///
/// The conversion is a pure scale: `value / points_per_inch * dpi`. It is
/// applied once, when geometry is handed to the engine; everything after
/// that point is unit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    pub points_per_inch: f32,
    pub dpi: f32,
}

impl UnitScale {
    pub fn new(points_per_inch: f32, dpi: f32) -> Self {
        Self {
            points_per_inch,
            dpi,
        }
    }

    /// Identity scale, for callers that already work in a single unit system.
    pub fn identity() -> Self {
        Self {
            points_per_inch: 1.0,
            dpi: 1.0,
        }
    }

    pub fn to_world(&self, page_value: f32) -> f32 {
        page_value / self.points_per_inch * self.dpi
    }

    pub fn to_page(&self, world_value: f32) -> f32 {
        world_value / self.dpi * self.points_per_inch
    }
}

impl Default for UnitScale {
    /// PDF points to a 96-dpi device space.
    fn default() -> Self {
        Self {
            points_per_inch: 72.0,
            dpi: 96.0,
        }
    }
}
