use std::io;

use thiserror::Error;

/// Result alias for document operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors raised while building or serializing a document.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The underlying writer or a source file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A TrueType font could not be parsed or is unknown to the document.
    #[error("font error: {0}")]
    Font(String),

    /// Image bytes could not be decoded for embedding.
    #[error("image error: {0}")]
    Image(String),

    /// A drawing operation was issued outside `begin_page`/`end_page`.
    #[error("no page is open")]
    NoOpenPage,
}
