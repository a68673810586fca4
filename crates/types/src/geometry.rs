use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Page right edge {right:.2} must be greater than left edge {left:.2}.")]
    InvertedEdges { left: f32, right: f32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grows the rectangle outward by `dx`/`dy` on each side.
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Horizontal extent of a page in one linear unit system.
///
/// Invariant: `right > left` and `width == right - left`, enforced by the
/// constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    left: f32,
    right: f32,
    width: f32,
}

impl PageGeometry {
    pub fn new(left: f32, right: f32) -> Result<Self, GeometryError> {
        if right <= left {
            return Err(GeometryError::InvertedEdges { left, right });
        }
        Ok(Self {
            left,
            right,
            width: right - left,
        })
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Rescales both edges into another unit system.
    pub fn scaled_by(&self, scale: impl Fn(f32) -> f32) -> Result<Self, GeometryError> {
        Self::new(scale(self.left), scale(self.right))
    }
}
