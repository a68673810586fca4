use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("The assembled document has no pages yet.")]
    EmptyDocument,

    #[error("Link destination page {0} does not exist in the assembled document.")]
    MissingDestination(usize),

    #[error("{0}")]
    Other(String),
}
