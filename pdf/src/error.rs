use thiserror::Error;

/// Errors emitted while reading PDF text.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The input bytes do not decode as a valid PDF structure.
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    /// The source PDF could not be read from the filesystem.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
    /// A page number outside `1..=page_count` was requested.
    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange {
        /// Requested 1-based page.
        page: usize,
        /// Pages in the document.
        page_count: usize,
    },
    /// The page exists but its content stream could not be decoded.
    #[error("failed to extract text from page {page}: {message}")]
    Extraction {
        /// 1-based page.
        page: usize,
        /// Decoder message.
        message: String,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, PdfError>;
