//! Merge PDF documents and prepend a clickable table-of-contents page.
//!
//! The pipeline appends each input document to an assembler while recording
//! its starting page, lays out a two-column TOC (description left, page
//! number right) with an injected text measurer, renders the TOC page, and
//! prepends it so every entry links to its document's first page.

use std::path::Path;

use log::info;
use lopdf::Document;
use thiserror::Error;

use toclink_composer::{Assembler, ComposerError};
use toclink_layout::{LayoutError, LayoutOptions, PlacedText, TocLayout};
use toclink_render_lopdf::TocPageRenderer;
use toclink_traits::{FontSpec, MeasureError, PageSurface, SurfaceError, TextMeasurer};
use toclink_types::{GeometryError, PageGeometry, TocEntry, UnitScale};

pub use toclink_composer as composer;
pub use toclink_layout as layout;
pub use toclink_render_lopdf as render;
pub use toclink_traits as traits;
pub use toclink_types as types;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No input documents were supplied.")]
    NoInputs,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Composition error: {0}")]
    Composer(#[from] ComposerError),

    #[error("Render error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Measurement error: {0}")]
    Measure(#[from] MeasureError),

    #[error("Page geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// One document to merge, with the name shown in the TOC when the entry
/// has no explicit label.
pub struct MergeInput {
    pub name: String,
    pub label: Option<String>,
    pub document: Document,
}

impl MergeInput {
    pub fn new(name: impl Into<String>, document: Document) -> Self {
        Self {
            name: name.into(),
            label: None,
            document,
        }
    }

    /// Loads an input from disk, using the file name as the TOC fallback
    /// label.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let document = Document::load(path)?;
        Ok(Self::new(name, document))
    }
}

/// Pipeline configuration: layout geometry, unit scale, fonts, and the
/// optional heading row.
pub struct TocOptions {
    pub layout: LayoutOptions,
    /// Page-unit to world-unit scale, applied once when the media box is
    /// handed to the layout engine. Identity keeps everything in points.
    pub scale: UnitScale,
    pub heading_font: FontSpec,
    pub entry_font: FontSpec,
    /// Caption row placed above the entries, description and page-number
    /// column text. `None` suppresses the row.
    pub heading: Option<(String, String)>,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            scale: UnitScale::identity(),
            heading_font: FontSpec::new("Helvetica-Bold", 12.0),
            entry_font: FontSpec::new("Helvetica", 11.0),
            heading: Some(("Document".to_string(), "Page".to_string())),
        }
    }
}

fn forward(surface: &mut dyn PageSurface, placed: &PlacedText) -> Result<(), SurfaceError> {
    surface.draw_text(&placed.text, &placed.font, placed.rect)?;
    if let Some(link) = placed.link {
        surface.add_link(placed.rect, link.page, link.margin_x, link.margin_y)?;
    }
    Ok(())
}

/// Merges `inputs` in order and prepends a TOC page linking to each
/// document's first page.
pub fn merge_with_toc(
    inputs: Vec<MergeInput>,
    measurer: &dyn TextMeasurer,
    options: &TocOptions,
) -> Result<Document, PipelineError> {
    if inputs.is_empty() {
        return Err(PipelineError::NoInputs);
    }

    let mut assembler = Assembler::new();
    let mut entries = Vec::new();
    for input in inputs {
        let start_page = assembler.append_document(input.document)?;
        // The TOC page itself shifts every destination down by one.
        let mut entry = TocEntry::new(input.name, start_page + 1);
        if let Some(label) = input.label {
            entry = entry.with_label(label);
        }
        entries.push(entry);
    }
    info!(
        "Assembled {} pages from {} documents",
        assembler.page_count(),
        entries.len()
    );

    // The one place page units become world units; the engine never sees
    // page units.
    let media_box = assembler.first_page_media_box()?;
    let page = PageGeometry::new(media_box[0], media_box[2])?
        .scaled_by(|v| options.scale.to_world(v))?;
    let toc = TocLayout::new(page, options.layout)?;

    let mut all_entries = Vec::with_capacity(entries.len() + 1);
    if let Some((label, caption)) = &options.heading {
        all_entries.push(TocEntry::heading(label.clone(), caption.clone()));
    }
    all_entries.extend(entries);

    let rows = toc.layout_table(
        &all_entries,
        measurer,
        &options.heading_font,
        &options.entry_font,
    )?;

    let mut surface = TocPageRenderer::new(media_box, options.scale);
    for row in &rows {
        forward(&mut surface, &row.description)?;
        if let Some(number) = &row.number {
            forward(&mut surface, number)?;
        }
    }

    assembler.prepend_page(surface.into_template()?)?;
    Ok(assembler.into_document())
}
