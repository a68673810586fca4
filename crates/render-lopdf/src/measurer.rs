use std::sync::Arc;
use toclink_traits::{FontSpec, MeasureError, TextMeasurer};
use toclink_types::Size;
use ttf_parser::Face;

/// Measures text by summing horizontal glyph advances from a font face.
///
/// Holds the raw font bytes and parses a lightweight `Face` view per call;
/// parsing reads only the table headers, and keeping bytes instead of a
/// `Face` avoids a self-referential struct. No shaping is performed: the
/// layout engine's contract is plain extent measurement.
pub struct FaceMeasurer {
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FaceMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceMeasurer")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FaceMeasurer {
    /// Validates the font data up front so later measurement calls cannot
    /// fail on parsing.
    pub fn new(data: Arc<Vec<u8>>) -> Result<Self, MeasureError> {
        Face::parse(&data, 0).map_err(|e| MeasureError::InvalidFontData(e.to_string()))?;
        Ok(Self { data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, MeasureError> {
        Self::new(Arc::new(data))
    }

    fn face(&self) -> Result<Face<'_>, MeasureError> {
        Face::parse(&self.data, 0).map_err(|e| MeasureError::InvalidFontData(e.to_string()))
    }
}

impl TextMeasurer for FaceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<Size, MeasureError> {
        let face = self.face()?;
        let units_per_em = face.units_per_em() as f32;
        let scale = font.size / units_per_em;

        // Characters the face has no glyph for fall back to the space
        // advance rather than collapsing to zero width.
        let space_advance = face
            .glyph_index(' ')
            .and_then(|id| face.glyph_hor_advance(id))
            .unwrap_or((units_per_em / 2.0) as u16);

        let mut width_units: f32 = 0.0;
        for ch in text.chars() {
            let advance = face
                .glyph_index(ch)
                .and_then(|id| face.glyph_hor_advance(id))
                .unwrap_or(space_advance);
            width_units += advance as f32;
        }

        let height_units = (face.ascender() as f32) - (face.descender() as f32);
        Ok(Size::new(width_units * scale, height_units * scale))
    }
}
