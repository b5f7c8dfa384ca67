//! Indexing progress, lifecycle state and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use docent_core::DocumentId;
use serde::{Deserialize, Serialize};

/// Progress update during document indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingProgress {
    /// Current stage of indexing.
    pub stage: IndexStage,
    /// Units of work done in this stage.
    pub current: usize,
    /// Units of work in this stage.
    pub total: usize,
    /// Human-readable status line.
    pub message: String,
}

impl IndexingProgress {
    /// Creates a new progress update.
    #[must_use]
    pub fn new(stage: IndexStage, current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            stage,
            current,
            total,
            message: message.into(),
        }
    }

    pub(crate) fn extracted(pages: usize, chunks: usize) -> Self {
        Self::new(
            IndexStage::Extracting,
            pages,
            pages,
            format!("Extracted {chunks} chunks from {pages} pages"),
        )
    }

    pub(crate) fn embedded(current: usize, total: usize) -> Self {
        Self::new(
            IndexStage::Embedding,
            current,
            total,
            format!("Embedding chunk {current} of {total}"),
        )
    }

    pub(crate) fn complete(chunks: usize) -> Self {
        let message = if chunks == 0 {
            "No text found in this document. It may be a scanned image; try OCR first.".to_owned()
        } else {
            format!("Indexed {chunks} chunks")
        };
        Self::new(IndexStage::Complete, chunks, chunks, message)
    }
}

/// Stages of the indexing process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStage {
    /// Reading and chunking page text.
    Extracting,
    /// Embedding chunks.
    Embedding,
    /// Indexing completed successfully.
    Complete,
}

/// Lifecycle of the engine's index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IndexState {
    /// Nothing usable is indexed.
    #[default]
    NotIndexed,
    /// Reading page text.
    Extracting,
    /// Embedding chunks.
    Embedding,
    /// The last run finished; queries are accepted.
    Indexed,
    /// The last run failed and the store was cleared.
    Failed {
        /// Why the run failed.
        message: String,
    },
}

impl IndexState {
    /// Whether an indexing run is underway.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Extracting | Self::Embedding)
    }
}

/// Summary of a finished indexing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Document that was indexed.
    pub document_id: DocumentId,
    /// Pages in the document.
    pub total_pages: usize,
    /// Normalized characters over all pages.
    pub total_characters: usize,
    /// Chunks embedded and stored.
    pub chunks: usize,
    /// Pages without extractable text.
    pub empty_pages: Vec<usize>,
    /// Embedding tokens consumed.
    pub tokens_used: u64,
}

impl IndexReport {
    /// Whether any page had extractable text.
    #[must_use]
    pub const fn has_text(&self) -> bool {
        self.chunks > 0
    }
}

/// Shared flag that asks an indexing run to stop.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag that is not raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Lowers the flag so it can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
