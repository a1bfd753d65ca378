//! Error types for card rendering

use std::io;
use std::path::PathBuf;

use meishi_pdf::PdfError;
use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a card render
#[derive(Error, Debug)]
pub enum Error {
    /// Image path has an extension other than png or jpg
    #[error("unsupported image format for {path}: only png and jpg are supported")]
    UnsupportedImageFormat { path: PathBuf },

    /// An asset file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The PDF writer rejected an operation
    #[error(transparent)]
    Pdf(#[from] PdfError),
}
