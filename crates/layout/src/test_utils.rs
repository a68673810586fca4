//! Deterministic measurers for layout tests.

use std::collections::HashMap;
use toclink_traits::{FontSpec, MeasureError, TextMeasurer};
use toclink_types::Size;

/// Reports the same extent for every string.
#[derive(Debug)]
pub struct FixedMeasurer {
    pub width: f32,
    pub height: f32,
}

impl FixedMeasurer {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, _text: &str, _font: &FontSpec) -> Result<Size, MeasureError> {
        Ok(Size::new(self.width, self.height))
    }
}

/// Looks widths up per string, with a shared height. Unknown strings get a
/// width proportional to their character count.
#[derive(Debug)]
pub struct TableMeasurer {
    widths: HashMap<String, f32>,
    height: f32,
}

impl TableMeasurer {
    pub fn new(height: f32) -> Self {
        Self {
            widths: HashMap::new(),
            height,
        }
    }

    pub fn with(mut self, text: &str, width: f32) -> Self {
        self.widths.insert(text.to_string(), width);
        self
    }
}

impl TextMeasurer for TableMeasurer {
    fn measure(&self, text: &str, _font: &FontSpec) -> Result<Size, MeasureError> {
        let width = self
            .widths
            .get(text)
            .copied()
            .unwrap_or_else(|| text.chars().count() as f32 * 6.0);
        Ok(Size::new(width, self.height))
    }
}
