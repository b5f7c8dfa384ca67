//! Error types for the RAG crate.

use docent_core::{DocumentId, NotConfigured};
use thiserror::Error;

/// Errors that can occur in indexing and query operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An embedding or generation backend was not configured.
    #[error(transparent)]
    NotConfigured(#[from] NotConfigured),

    /// A page's text could not be obtained.
    #[error("failed to extract text from page {page}: {source}")]
    Extraction {
        /// 1-based page number.
        page: usize,
        /// Underlying error from the document source.
        #[source]
        source: anyhow::Error,
    },

    /// The embedding backend failed.
    #[error("embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    /// The generation backend failed.
    #[error("generation failed: {0}")]
    Generation(#[source] anyhow::Error),

    /// A query was issued while no document is indexed.
    #[error("document is not indexed; index it before asking questions")]
    NotIndexed,

    /// Records for two different documents would end up in one store.
    #[error("store holds document {expected}, refusing records of document {actual}")]
    DocumentMismatch {
        /// Document the store currently tracks.
        expected: DocumentId,
        /// Document named by the rejected record or request.
        actual: DocumentId,
    },

    /// Dimension mismatch between a vector and the vectors already stored.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension provided.
        actual: usize,
    },

    /// A query arrived while an indexing run owns the store.
    #[error("indexing is in progress")]
    IndexingInProgress,

    /// The indexing run was cancelled by the caller.
    #[error("indexing was cancelled")]
    Cancelled,

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RagError {
    /// Wraps an embedding backend error, keeping configuration errors distinct.
    pub(crate) fn embedding(error: anyhow::Error) -> Self {
        match NotConfigured::find(&error) {
            Some(marker) => Self::NotConfigured(marker),
            None => Self::Embedding(error),
        }
    }

    /// Wraps a generation backend error, keeping configuration errors distinct.
    pub(crate) fn generation(error: anyhow::Error) -> Self {
        match NotConfigured::find(&error) {
            Some(marker) => Self::NotConfigured(marker),
            None => Self::Generation(error),
        }
    }

    /// `true` for missing backends and invalid settings; retrying will not help.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured(_) | Self::InvalidConfig(_))
    }

    /// `true` when the call was made against a store in the wrong state.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotIndexed
                | Self::DocumentMismatch { .. }
                | Self::DimensionMismatch { .. }
                | Self::IndexingInProgress
        )
    }
}

/// Result type alias for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_marker_survives_wrapping() {
        let err = RagError::embedding(NotConfigured::new("embedding").into());
        assert!(matches!(err, RagError::NotConfigured(_)));
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "embedding backend is not configured");
    }

    #[test]
    fn provider_errors_pass_through() {
        let err = RagError::generation(anyhow::anyhow!("rate limited"));
        assert!(matches!(err, RagError::Generation(_)));
        assert_eq!(err.to_string(), "generation failed: rate limited");
        assert!(!err.is_configuration());
        assert!(!err.is_precondition());
    }

    #[test]
    fn precondition_classification() {
        assert!(RagError::NotIndexed.is_precondition());
        assert!(RagError::IndexingInProgress.is_precondition());
        assert!(
            RagError::DimensionMismatch {
                expected: 3,
                actual: 4
            }
            .is_precondition()
        );
        assert!(!RagError::Cancelled.is_precondition());
    }
}
