//! PDF page text for docent.
//!
//! [`PdfDocument`] loads a PDF with `lopdf` and exposes its pages through
//! [`DocumentSource`], so a PDF can be handed straight to the indexing pipeline.
//! Pages are numbered from 1 in document order. Pages carrying only images yield
//! empty text, which the segmenter reports as pages without text.

mod error;
mod metadata;

pub use error::{PdfError, Result};
pub use metadata::PdfMetadata;

use std::path::Path;

use docent_core::{DocumentId, DocumentSource};
use lopdf::Document;
use tracing::debug;

/// A parsed PDF file.
#[derive(Debug)]
pub struct PdfDocument {
    document: Document,
    /// `lopdf` page numbers in document order.
    pages: Vec<u32>,
    id: DocumentId,
}

impl PdfDocument {
    /// Loads a PDF file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read, or [`PdfError::Parse`] if it
    /// is not a valid PDF.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "loading PDF");
        Self::from_bytes(bytes)
    }

    /// Parses a PDF held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Parse`] if the bytes are not a valid PDF.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        let document = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
        let mut pages: Vec<u32> = document.get_pages().keys().copied().collect();
        pages.sort_unstable();

        Ok(Self {
            document,
            pages,
            id: DocumentId::from_content(bytes),
        })
    }

    /// Identity derived from the file's bytes.
    #[must_use]
    pub const fn document_id(&self) -> &DocumentId {
        &self.id
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Title and author from the document information dictionary.
    #[must_use]
    pub fn metadata(&self) -> PdfMetadata {
        metadata::extract(&self.document)
    }

    /// Text of `page` (1-based), with lines trimmed and blank lines removed.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PageOutOfRange`] for a page that does not exist, or
    /// [`PdfError::Extraction`] if the page's content cannot be decoded.
    pub fn page_text(&self, page: usize) -> Result<String> {
        let number = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .copied()
            .ok_or(PdfError::PageOutOfRange {
                page,
                page_count: self.pages.len(),
            })?;

        let raw = self
            .document
            .extract_text(&[number])
            .map_err(|e| PdfError::Extraction {
                page,
                message: e.to_string(),
            })?;
        Ok(normalize_text(&raw))
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        Self::page_count(self)
    }

    fn page_text(&self, page_number: usize) -> docent_core::Result<String> {
        Ok(Self::page_text(self, page_number)?)
    }
}

fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
