use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat, dictionary};
use std::collections::HashMap;
use toclink_composer::{PageLink, PageTemplate};
use toclink_traits::{FontSpec, PageSurface, SurfaceError};
use toclink_types::{Rect, UnitScale};

/// Accumulates draw and link commands for one TOC page, then materializes
/// them as a `PageTemplate`.
///
/// Placements arrive in world units with a top-down y axis; emission
/// converts to page units and flips to PDF's bottom-up axis against the
/// media box's top edge.
pub struct TocPageRenderer {
    media_box: [f32; 4],
    scale: UnitScale,
    ops: Vec<Operation>,
    links: Vec<PageLink>,
    /// Base-font name to content-stream resource name (F1, F2, ...), in
    /// first-use order.
    fonts: Vec<(String, String)>,
    font_lookup: HashMap<String, usize>,
}

impl TocPageRenderer {
    pub fn new(media_box: [f32; 4], scale: UnitScale) -> Self {
        Self {
            media_box,
            scale,
            ops: Vec::new(),
            links: Vec::new(),
            fonts: Vec::new(),
            font_lookup: HashMap::new(),
        }
    }

    fn flip_y(&self, page_y: f32) -> f32 {
        self.media_box[3] - page_y
    }

    fn resource_name(&mut self, base_font: &str) -> String {
        if let Some(&idx) = self.font_lookup.get(base_font) {
            return self.fonts[idx].1.clone();
        }
        let name = format!("F{}", self.fonts.len() + 1);
        self.font_lookup
            .insert(base_font.to_string(), self.fonts.len());
        self.fonts.push((base_font.to_string(), name.clone()));
        name
    }

    /// Finishes the page. Consumes the renderer so a surface cannot be
    /// reused across pages.
    pub fn into_template(self) -> Result<PageTemplate, SurfaceError> {
        let content = Content {
            operations: self.ops,
        }
        .encode()
        .map_err(|e| SurfaceError::Content(e.to_string()))?;

        let mut font_dict = lopdf::Dictionary::new();
        for (base_font, resource_name) in &self.fonts {
            font_dict.set(
                resource_name.as_bytes(),
                Object::Dictionary(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => base_font.clone(),
                    "Encoding" => "WinAnsiEncoding",
                }),
            );
        }

        debug!(
            "TOC page content: {} bytes, {} fonts, {} links",
            content.len(),
            self.fonts.len(),
            self.links.len()
        );

        Ok(PageTemplate {
            media_box: self.media_box,
            content,
            resources: dictionary! { "Font" => font_dict },
            links: self.links,
        })
    }
}

/// Single-byte encoding for the content stream. Codepoints beyond Latin-1
/// are replaced; the TOC only ever shows file names and page numbers.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

impl PageSurface for TocPageRenderer {
    fn draw_text(&mut self, text: &str, font: &FontSpec, rect: Rect) -> Result<(), SurfaceError> {
        let x = self.scale.to_page(rect.x);
        let top = self.scale.to_page(rect.y);
        let height = self.scale.to_page(rect.height);
        let size = self.scale.to_page(font.size);

        // Baseline sits at the bottom of the placed box.
        let baseline = self.flip_y(top + height);
        let resource_name = self.resource_name(&font.name);

        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(resource_name.into_bytes()), size.into()],
        ));
        self.ops
            .push(Operation::new("Td", vec![x.into(), baseline.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
        Ok(())
    }

    fn add_link(
        &mut self,
        rect: Rect,
        destination: usize,
        margin_x: f32,
        margin_y: f32,
    ) -> Result<(), SurfaceError> {
        let x = self.scale.to_page(rect.x);
        let top = self.scale.to_page(rect.y);
        let width = self.scale.to_page(rect.width);
        let height = self.scale.to_page(rect.height);
        let mx = self.scale.to_page(margin_x);
        let my = self.scale.to_page(margin_y);

        // PDF rectangles are [llx, lly, urx, ury] with y pointing up.
        let hit_area = Rect::new(x, self.flip_y(top + height), width, height).inflate(mx, my);
        self.links.push(PageLink {
            rect: [hit_area.x, hit_area.y, hit_area.right(), hit_area.bottom()],
            destination,
        });
        Ok(())
    }
}
