//! PDF assembly on top of lopdf.
//!
//! The assembler owns the output document. Source documents are appended
//! whole, with a deep object copy so ids never collide, and the 1-based
//! start page of each appended run is returned for TOC bookkeeping. A
//! synthesized page (the table of contents) can be prepended afterwards,
//! together with its link annotations.

mod error;

pub use error::ComposerError;

use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;

/// Copies objects between documents, remapping ids as it goes.
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    /// Deep copies one object and everything it references.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(&target_id) = self.id_map.get(&source_id) {
            return Ok(target_id);
        }

        // Reserve the target id before recursing so cyclic references
        // (Page -> Parent -> Kids -> Page) terminate. The placeholder is
        // replaced once the object's own references are remapped.
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source.get_object(source_id)?.clone();
        let remapped = self.remap_references(obj)?;

        match self.target.objects.get_mut(&new_id) {
            Some(slot) => *slot = remapped,
            None => return Err(lopdf::Error::ObjectNotFound(new_id)),
        }

        Ok(new_id)
    }

    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(items))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }
}

/// Page attributes that may live anywhere up the page tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Resolves `key` for a page, walking up the Parent chain when the page
/// dictionary does not carry it directly.
fn inherited_page_value<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    loop {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_object(parent_id).ok()?.as_dict().ok()?;
    }
}

/// A clickable region destined for the prepended page, in PDF coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PageLink {
    /// `[x0, y0, x1, y1]` in the page's coordinate space.
    pub rect: [f32; 4],
    /// 1-based page index in the final document (after prepending).
    pub destination: usize,
}

/// Everything needed to materialize one synthesized page.
#[derive(Debug)]
pub struct PageTemplate {
    pub media_box: [f32; 4],
    pub content: Vec<u8>,
    pub resources: Dictionary,
    pub links: Vec<PageLink>,
}

/// Builds one output document out of appended sources plus a prepended
/// TOC page.
pub struct Assembler {
    doc: Document,
    pages_id: ObjectId,
}

impl Assembler {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(Vec::new()),
                "Count" => 0,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Self { doc, pages_id }
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Appends all pages of `source`, returning the 1-based page number at
    /// which the appended run starts.
    pub fn append_document(&mut self, source: Document) -> Result<usize, ComposerError> {
        let start_page = self.page_count() + 1;

        let source_pages = source.get_pages();
        if source_pages.is_empty() {
            return Ok(start_page);
        }
        let appended = source_pages.len();

        let mut sorted_pages: Vec<_> = source_pages.into_iter().collect();
        sorted_pages.sort_by_key(|(page_num, _)| *page_num);

        let mut copier = ObjectCopier::new(&source, &mut self.doc);
        let mut copied_ids = Vec::with_capacity(sorted_pages.len());
        for (_, page_id) in sorted_pages {
            // Recursively copies the page dictionary plus its content
            // streams, resources, and fonts.
            let new_id = copier.copy_object(page_id)?;

            // The source page tree is not copied, so attributes a page
            // inherits from it must land on the page itself before the
            // Parent rewrite below cuts the chain.
            let source_page = source.get_object(page_id)?.as_dict()?;
            for key in INHERITABLE_PAGE_KEYS {
                if source_page.has(key) {
                    continue;
                }
                let Some(value) = inherited_page_value(&source, page_id, key) else {
                    continue;
                };
                let remapped = copier.remap_references(value.clone())?;
                copier
                    .target
                    .get_object_mut(new_id)?
                    .as_dict_mut()?
                    .set(key, remapped);
            }

            copied_ids.push(new_id);
        }

        let pages_dict = self.pages_dict_mut()?;
        let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
        let count = pages_dict.get(b"Count")?.as_i64()?;
        kids.extend(copied_ids.iter().map(|&id| Object::Reference(id)));
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", count + appended as i64);

        // Copied pages still point at the source page tree.
        for page_id in &copied_ids {
            if let Ok(Object::Dictionary(page_dict)) = self.doc.get_object_mut(*page_id) {
                page_dict.set("Parent", Object::Reference(self.pages_id));
            }
        }

        debug!("Appended {} pages starting at page {}", appended, start_page);
        Ok(start_page)
    }

    /// Media box of the first assembled page, used to size the TOC page.
    ///
    /// Appending materializes inherited attributes onto each page, so the
    /// box is always on the page dictionary itself.
    pub fn first_page_media_box(&self) -> Result<[f32; 4], ComposerError> {
        let pages = self.doc.get_pages();
        let (_, &page_id) = pages.iter().next().ok_or(ComposerError::EmptyDocument)?;
        let page_dict = self.doc.get_object(page_id)?.as_dict()?;

        let values = page_dict.get(b"MediaBox")?.as_array()?;
        if values.len() != 4 {
            return Err(ComposerError::Other(format!(
                "MediaBox has {} entries, expected 4.",
                values.len()
            )));
        }
        let mut out = [0.0f32; 4];
        for (slot, value) in out.iter_mut().zip(values) {
            // MediaBox entries may be integers or reals.
            *slot = match value.as_f32() {
                Ok(v) => v,
                Err(_) => value.as_i64()? as f32,
            };
        }
        Ok(out)
    }

    /// Inserts a synthesized page as page 1 and wires up its link
    /// annotations. Link destinations are resolved against the final page
    /// numbering, i.e. after the insertion.
    pub fn prepend_page(&mut self, template: PageTemplate) -> Result<ObjectId, ComposerError> {
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, template.content));
        let resources_id = self.doc.add_object(Object::Dictionary(template.resources));

        let [x0, y0, x1, y1] = template.media_box;
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![x0.into(), y0.into(), x1.into(), y1.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        let pages_dict = self.pages_dict_mut()?;
        let mut kids = vec![Object::Reference(page_id)];
        kids.extend(pages_dict.get(b"Kids")?.as_array()?.clone());
        let count = pages_dict.get(b"Count")?.as_i64()?;
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", count + 1);

        // Page numbering is final from here on; resolve destinations now.
        let page_map = self.doc.get_pages();
        let mut annot_ids = Vec::with_capacity(template.links.len());
        for link in &template.links {
            let dest_id = *page_map
                .get(&(link.destination as u32))
                .ok_or(ComposerError::MissingDestination(link.destination))?;
            let [lx0, ly0, lx1, ly1] = link.rect;
            let action_id = self.doc.add_object(dictionary! {
                "Type" => "Action",
                "S" => "GoTo",
                "D" => vec![Object::Reference(dest_id), "Fit".into()],
            });
            let annot_id = self.doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![lx0.into(), ly0.into(), lx1.into(), ly1.into()],
                "Border" => vec![0.into(), 0.into(), 0.into()],
                "A" => action_id,
            });
            annot_ids.push(Object::Reference(annot_id));
        }

        if !annot_ids.is_empty() {
            let page_dict = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
            page_dict.set("Annots", Object::Array(annot_ids));
        }

        debug!(
            "Prepended synthesized page with {} links",
            template.links.len()
        );
        Ok(page_id)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    fn pages_dict_mut(&mut self) -> Result<&mut Dictionary, ComposerError> {
        Ok(self.doc.get_object_mut(self.pages_id)?.as_dict_mut()?)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, StringFormat, dictionary};

    /// A small in-memory document with one text line per page.
    fn sample_doc(num_pages: u32, text_prefix: &str) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = vec![];
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{} {}", text_prefix, i).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => num_pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    fn page_text(doc: &Document, page_number: u32) -> String {
        let pages = doc.get_pages();
        let content = doc.get_page_content(*pages.get(&page_number).unwrap()).unwrap();
        String::from_utf8_lossy(&content).into_owned()
    }

    #[test]
    fn append_tracks_start_pages() {
        let mut assembler = Assembler::new();
        let first = assembler.append_document(sample_doc(2, "First")).unwrap();
        let second = assembler.append_document(sample_doc(3, "Second")).unwrap();
        let third = assembler.append_document(sample_doc(1, "Third")).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 3);
        assert_eq!(third, 6);
        assert_eq!(assembler.page_count(), 6);
    }

    #[test]
    fn append_preserves_page_order() {
        let mut assembler = Assembler::new();
        assembler.append_document(sample_doc(2, "First")).unwrap();
        assembler.append_document(sample_doc(2, "Second")).unwrap();

        let doc = assembler.into_document();
        assert!(page_text(&doc, 1).contains("First 1"));
        assert!(page_text(&doc, 2).contains("First 2"));
        assert!(page_text(&doc, 3).contains("Second 1"));
        assert!(page_text(&doc, 4).contains("Second 2"));
    }

    #[test]
    fn appending_an_empty_document_is_a_no_op() {
        let mut assembler = Assembler::new();
        assembler.append_document(sample_doc(2, "First")).unwrap();
        let start = assembler
            .append_document(Document::with_version("1.7"))
            .unwrap();
        assert_eq!(start, 3);
        assert_eq!(assembler.page_count(), 2);
    }

    #[test]
    fn media_box_comes_from_the_first_page() {
        let mut assembler = Assembler::new();
        assert!(matches!(
            assembler.first_page_media_box(),
            Err(ComposerError::EmptyDocument)
        ));

        assembler.append_document(sample_doc(1, "Doc")).unwrap();
        assert_eq!(
            assembler.first_page_media_box().unwrap(),
            [0.0, 0.0, 612.0, 792.0]
        );
    }

    #[test]
    fn prepended_page_becomes_page_one() {
        let mut assembler = Assembler::new();
        assembler.append_document(sample_doc(2, "Body")).unwrap();

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        b"Table of Contents".to_vec(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        assembler
            .prepend_page(PageTemplate {
                media_box: [0.0, 0.0, 612.0, 792.0],
                content: content.encode().unwrap(),
                resources: dictionary! {
                    "Font" => dictionary! {
                        "F1" => dictionary! {
                            "Type" => "Font",
                            "Subtype" => "Type1",
                            "BaseFont" => "Helvetica",
                        },
                    },
                },
                links: vec![
                    PageLink {
                        rect: [30.0, 600.0, 180.0, 615.0],
                        destination: 2,
                    },
                    PageLink {
                        rect: [30.0, 560.0, 180.0, 575.0],
                        destination: 3,
                    },
                ],
            })
            .unwrap();

        let doc = assembler.into_document();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(page_text(&doc, 1).contains("Table of Contents"));
        assert!(page_text(&doc, 2).contains("Body 1"));

        // The annotations landed on page 1 and point at real pages.
        let pages = doc.get_pages();
        let page_dict = doc.get_object(*pages.get(&1).unwrap()).unwrap().as_dict().unwrap();
        let annots = page_dict.get(b"Annots").unwrap().as_array().unwrap();
        assert_eq!(annots.len(), 2);
        for annot in annots {
            let annot_dict = doc
                .get_object(annot.as_reference().unwrap())
                .unwrap()
                .as_dict()
                .unwrap();
            assert_eq!(annot_dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Link");
            let action = doc
                .get_object(annot_dict.get(b"A").unwrap().as_reference().unwrap())
                .unwrap()
                .as_dict()
                .unwrap();
            assert_eq!(action.get(b"S").unwrap().as_name().unwrap(), b"GoTo");
            let dest = action.get(b"D").unwrap().as_array().unwrap();
            assert!(matches!(dest[0], Object::Reference(_)));
        }
    }

    /// Like `sample_doc`, but MediaBox and Resources live only on the page
    /// tree root and reach the pages by inheritance.
    fn inherited_attrs_doc(num_pages: u32, text_prefix: &str) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = vec![];
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{} {}", text_prefix, i).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => num_pages as i64,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    #[test]
    fn inherited_page_attributes_survive_the_append() {
        let mut assembler = Assembler::new();
        assembler
            .append_document(inherited_attrs_doc(2, "Body"))
            .unwrap();

        // The source page tree is gone, so the box must now be on the page.
        assert_eq!(
            assembler.first_page_media_box().unwrap(),
            [0.0, 0.0, 612.0, 792.0]
        );

        let doc = assembler.into_document();
        for (_, page_id) in doc.get_pages() {
            let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
            assert!(page_dict.has(b"MediaBox"));
            assert!(page_dict.has(b"Resources"));
        }
        assert!(page_text(&doc, 1).contains("Body 1"));
        assert!(page_text(&doc, 2).contains("Body 2"));
    }

    #[test]
    fn prepend_rejects_unknown_destinations() {
        let mut assembler = Assembler::new();
        assembler.append_document(sample_doc(1, "Body")).unwrap();

        let result = assembler.prepend_page(PageTemplate {
            media_box: [0.0, 0.0, 612.0, 792.0],
            content: Vec::new(),
            resources: dictionary! {},
            links: vec![PageLink {
                rect: [0.0, 0.0, 10.0, 10.0],
                destination: 9,
            }],
        });
        assert!(matches!(result, Err(ComposerError::MissingDestination(9))));
    }
}
