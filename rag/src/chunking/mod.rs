//! Page-aware text segmentation.
//!
//! The [`Segmenter`] turns the pages of a [`DocumentSource`] into overlapping
//! [`Chunk`]s. Every chunk stays on one page so answers can cite page numbers,
//! and offsets refer to the page's text after [`normalize_whitespace`].

mod window;

use docent_core::DocumentSource;
use tracing::debug;

use crate::cleaning::normalize_whitespace;
use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::types::{Chunk, SegmentedDocument};

/// Splits page text into overlapping, sentence-aware chunks.
///
/// # Example
///
/// ```rust
/// use docent_rag::chunking::Segmenter;
///
/// let segmenter = Segmenter::new(100, 20);
/// let mut next_id = 0;
/// let chunks = segmenter.chunk_page("Short page.", 1, &mut next_id);
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(next_id, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    /// Maximum size of each chunk in characters.
    chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    overlap: usize,
}

impl Segmenter {
    /// Creates a new segmenter.
    ///
    /// # Panics
    /// Panics if `overlap >= chunk_size`.
    #[must_use]
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(
            overlap < chunk_size,
            "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
        );
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Creates a segmenter from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] when the chunk settings are inconsistent.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.chunk_size, config.chunk_overlap))
    }

    /// Maximum characters per chunk.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Characters shared by consecutive chunks.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunks one page of already normalized text.
    ///
    /// Chunk ids are taken from `next_id`, which is advanced past the last chunk
    /// so ids keep increasing across pages.
    pub fn chunk_page(&self, text: &str, page_number: usize, next_id: &mut usize) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        window::split_windows(&chars, self.chunk_size, self.overlap)
            .into_iter()
            .map(|(start, end)| {
                let chunk = Chunk {
                    id: *next_id,
                    text: chars[start..end].iter().collect(),
                    page_number,
                    start_offset: start,
                    end_offset: end,
                };
                *next_id += 1;
                chunk
            })
            .collect()
    }

    /// Extracts, normalizes and chunks every page of `source`.
    ///
    /// Pages that normalize to nothing are reported in
    /// [`SegmentedDocument::empty_pages`] instead of producing chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Extraction`] naming the first page whose text could not be read.
    pub fn extract_and_chunk<D: DocumentSource + ?Sized>(&self, source: &D) -> Result<SegmentedDocument> {
        let total_pages = source.page_count();
        let mut document = SegmentedDocument {
            total_pages,
            ..SegmentedDocument::default()
        };
        let mut next_id = 0;

        for page in 1..=total_pages {
            let raw = source
                .page_text(page)
                .map_err(|source| RagError::Extraction { page, source })?;
            let text = normalize_whitespace(&raw);
            if text.is_empty() {
                document.empty_pages.push(page);
                continue;
            }
            document.total_characters += text.chars().count();
            let chunks = self.chunk_page(&text, page, &mut next_id);
            debug!(page, chunks = chunks.len(), "segmented page");
            document.chunks.extend(chunks);
        }

        Ok(document)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(500, 50)
    }
}
