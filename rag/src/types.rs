//! Core types for the RAG crate.

use docent_core::DocumentId;
use serde::{Deserialize, Serialize};

/// A span of one page's normalized text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk within the document, starting at 0.
    pub id: usize,
    /// Text content of the chunk.
    pub text: String,
    /// 1-based page the text came from.
    pub page_number: usize,
    /// Start of the span in the page's normalized text, in characters.
    pub start_offset: usize,
    /// End of the span (exclusive), in characters.
    pub end_offset: usize,
}

impl Chunk {
    /// Length of the span in characters.
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}

/// Output of extracting and chunking a whole document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedDocument {
    /// Chunks in page order, then offset order.
    pub chunks: Vec<Chunk>,
    /// Pages in the source document.
    pub total_pages: usize,
    /// Normalized characters over all pages.
    pub total_characters: usize,
    /// Pages with no text after normalization (often scanned images).
    pub empty_pages: Vec<usize>,
}

impl SegmentedDocument {
    /// Whether any page produced text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.chunks.is_empty()
    }
}

/// Provenance attached to every stored vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// 1-based page of the source chunk.
    pub page_number: usize,
    /// Id of the source chunk.
    pub chunk_index: usize,
    /// Document the record belongs to.
    pub document_id: Option<DocumentId>,
}

/// One embedded chunk held by the vector store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique key (format: `chunk_{n}`).
    pub id: String,
    /// Chunk text.
    pub text: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Provenance.
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        embedding: Vec<f32>,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
            metadata,
        }
    }

    /// Builds the record for an embedded chunk.
    #[must_use]
    pub fn from_chunk(chunk: Chunk, embedding: Vec<f32>, document_id: Option<DocumentId>) -> Self {
        Self {
            id: format!("chunk_{}", chunk.id),
            text: chunk.text,
            embedding,
            metadata: RecordMetadata {
                page_number: chunk.page_number,
                chunk_index: chunk.id,
                document_id,
            },
        }
    }

    /// Dimensionality of the embedding.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.embedding.len()
    }
}

/// A search result containing a record and its similarity score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matching record.
    pub record: VectorRecord,
    /// Cosine similarity in [-1, 1].
    pub similarity: f32,
}

impl SearchResult {
    /// Page the passage came from.
    #[must_use]
    pub const fn page_number(&self) -> usize {
        self.record.metadata.page_number
    }

    /// Similarity as a whole percentage, as shown to users and models.
    #[must_use]
    pub fn relevance_percent(&self) -> i32 {
        // Similarity is clamped to [-1, 1], so the cast cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        let percent = (self.similarity * 100.0).round() as i32;
        percent
    }
}

/// A passage backing an answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    /// 1-based page number.
    pub page_number: usize,
    /// Beginning of the passage, ending in `...` when shortened.
    pub excerpt: String,
    /// Cosine similarity to the question.
    pub similarity: f32,
}

impl SourceCitation {
    /// Cites a search result, keeping at most `excerpt_chars` characters of its text.
    #[must_use]
    pub fn from_result(result: &SearchResult, excerpt_chars: usize) -> Self {
        let text = &result.record.text;
        let excerpt = match text.char_indices().nth(excerpt_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.clone(),
        };
        Self {
            page_number: result.page_number(),
            excerpt,
            similarity: result.similarity,
        }
    }
}

/// Answer to a question about the indexed document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Generated answer text.
    pub answer: String,
    /// Passages that were given to the model, most relevant first.
    pub sources: Vec<SourceCitation>,
    /// Tokens consumed by generation.
    pub tokens_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str, similarity: f32) -> SearchResult {
        let chunk = Chunk {
            id: 4,
            text: text.to_owned(),
            page_number: 2,
            start_offset: 0,
            end_offset: text.chars().count(),
        };
        SearchResult {
            record: VectorRecord::from_chunk(chunk, vec![1.0, 0.0], Some("doc".into())),
            similarity,
        }
    }

    #[test]
    fn record_from_chunk_keeps_provenance() {
        let r = result("hello", 0.5);
        assert_eq!(r.record.id, "chunk_4");
        assert_eq!(r.record.metadata.chunk_index, 4);
        assert_eq!(r.record.metadata.page_number, 2);
        assert_eq!(r.record.metadata.document_id, Some(DocumentId::from("doc")));
        assert_eq!(r.record.dim(), 2);
    }

    #[test]
    fn short_excerpt_is_untouched() {
        let citation = SourceCitation::from_result(&result("short passage", 0.8), 200);
        assert_eq!(citation.excerpt, "short passage");
        assert_eq!(citation.page_number, 2);
    }

    #[test]
    fn long_excerpt_is_cut_on_char_boundary() {
        let text = "é".repeat(250);
        let citation = SourceCitation::from_result(&result(&text, 0.8), 200);
        assert_eq!(citation.excerpt.chars().count(), 203);
        assert!(citation.excerpt.ends_with("..."));
    }

    #[test]
    fn relevance_is_rounded_percent() {
        assert_eq!(result("x", 0.874).relevance_percent(), 87);
        assert_eq!(result("x", 1.0).relevance_percent(), 100);
    }
}
