/// One row of the table of contents.
#[derive(Debug, Clone, Default)]
pub struct TocEntry {
    /// Display text for the description column. May be empty, in which case
    /// `source_name` is shown instead.
    pub label: String,
    /// Name of the originating document, used as the fallback label.
    pub source_name: String,
    /// 1-based page the entry links to. `None` makes this a plain heading
    /// row with no link.
    pub destination: Option<usize>,
    /// Overrides the page-number column text. Used for header rows, where
    /// the right column shows a caption rather than a number.
    pub number_label: Option<String>,
}

impl TocEntry {
    pub fn new(source_name: impl Into<String>, destination: usize) -> Self {
        Self {
            label: String::new(),
            source_name: source_name.into(),
            destination: Some(destination),
            number_label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// A non-clickable heading row, e.g. the "Document" / "Page" caption line.
    pub fn heading(label: impl Into<String>, number_label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source_name: String::new(),
            destination: None,
            number_label: Some(number_label.into()),
        }
    }

    pub fn is_heading(&self) -> bool {
        self.destination.is_none()
    }

    /// The description text actually shown: the label, or the source name
    /// when the label is blank. A presentation default, not an error case.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.source_name
        } else {
            &self.label
        }
    }

    /// The page-number column text: the override when present, otherwise
    /// the destination page number. Empty for headings with no caption.
    pub fn number_text(&self) -> String {
        match (&self.number_label, self.destination) {
            (Some(caption), _) => caption.clone(),
            (None, Some(page)) => page.to_string(),
            (None, None) => String::new(),
        }
    }
}
