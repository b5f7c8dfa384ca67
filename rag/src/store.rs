//! In-memory vector store for the chunks of one document.

use std::fmt;
use std::sync::Arc;

use docent_core::{DocumentId, EmbeddingModel};
use futures::StreamExt;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{RagError, Result};
use crate::index::FlatIndex;
use crate::indexing::CancellationFlag;
use crate::limiter::{RateLimit, TokenBucket};
use crate::types::{Chunk, SearchResult, VectorRecord};

/// Separator placed between passages in a prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Embedded chunks of a single document, searchable by cosine similarity.
///
/// Every embedding call made through the store, for indexing or for queries,
/// passes through one shared [`TokenBucket`].
pub struct VectorStore<M> {
    embedder: Arc<M>,
    index: Arc<RwLock<FlatIndex>>,
    limiter: Arc<TokenBucket>,
    concurrency: usize,
}

impl<M> Clone for VectorStore<M> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            index: Arc::clone(&self.index),
            limiter: Arc::clone(&self.limiter),
            concurrency: self.concurrency,
        }
    }
}

impl<M> fmt::Debug for VectorStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index.read();
        f.debug_struct("VectorStore")
            .field("records", &index.len())
            .field("dimension", &index.dimension())
            .field("document_id", &index.document_id())
            .field("rate_limit", &self.limiter.limit())
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl<M: EmbeddingModel> VectorStore<M> {
    /// Creates an empty store with the default rate limit and sequential embedding.
    #[must_use]
    pub fn new(embedder: M) -> Self {
        Self::with_rate_limit(embedder, RateLimit::default(), 1)
    }

    /// Creates an empty store with explicit pacing.
    ///
    /// `concurrency` is clamped to at least one call in flight.
    #[must_use]
    pub fn with_rate_limit(embedder: M, limit: RateLimit, concurrency: usize) -> Self {
        Self {
            embedder: Arc::new(embedder),
            index: Arc::new(RwLock::new(FlatIndex::default())),
            limiter: Arc::new(TokenBucket::new(limit)),
            concurrency: concurrency.max(1),
        }
    }

    /// The embedding backend.
    #[must_use]
    pub fn embedder(&self) -> &M {
        &self.embedder
    }

    /// Removes every record and forgets the document id and dimension.
    pub fn clear(&self) {
        self.index.write().clear();
    }

    /// Records which document the store belongs to and tags untagged records with it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentMismatch`] if records of another document are stored.
    pub fn set_document_id(&self, id: DocumentId) -> Result<()> {
        self.index.write().set_document_id(id)
    }

    /// Document the store currently belongs to.
    #[must_use]
    pub fn document_id(&self) -> Option<DocumentId> {
        self.index.read().document_id().cloned()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Dimensionality of the stored vectors, once the first record is in.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.index.read().dimension()
    }

    /// Snapshot of all records in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<VectorRecord> {
        self.index.read().records().to_vec()
    }

    /// Inserts a record with a precomputed embedding, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] or [`RagError::DocumentMismatch`] when the
    /// record does not fit the records already stored.
    pub fn add_record(&self, record: VectorRecord) -> Result<()> {
        self.index.write().upsert(record)
    }

    /// Embeds `chunks` and stores them tagged with the current document id.
    ///
    /// Calls are rate limited and run up to the configured concurrency, but records are
    /// stored in chunk order. `on_progress(done, total)` fires after each stored record.
    /// Returns the embedding tokens consumed.
    ///
    /// # Errors
    ///
    /// Stops at the first embedding failure, or with [`RagError::Cancelled`] once `cancel`
    /// is raised. Records stored before the failure are left in place.
    pub async fn add_chunks_with_embeddings<F>(
        &self,
        chunks: Vec<Chunk>,
        cancel: &CancellationFlag,
        mut on_progress: F,
    ) -> Result<u64>
    where
        F: FnMut(usize, usize),
    {
        let total = chunks.len();
        let document_id = self.document_id();
        let embedder = &*self.embedder;
        let limiter = &*self.limiter;

        let mut embedded = futures::stream::iter(chunks)
            .map(|chunk| async move {
                if cancel.is_cancelled() {
                    return Err(RagError::Cancelled);
                }
                limiter.acquire().await;
                let embedding = embedder
                    .embed(&chunk.text)
                    .await
                    .map_err(RagError::embedding)?;
                Ok((chunk, embedding))
            })
            .buffered(self.concurrency);

        let mut tokens_used = 0;
        let mut done = 0;
        while let Some(next) = embedded.next().await {
            let (chunk, embedding) = next?;
            if cancel.is_cancelled() {
                return Err(RagError::Cancelled);
            }
            trace!(chunk = chunk.id, tokens = embedding.tokens_used, "embedded chunk");
            tokens_used += embedding.tokens_used;
            self.add_record(VectorRecord::from_chunk(
                chunk,
                embedding.vector,
                document_id.clone(),
            ))?;
            done += 1;
            on_progress(done, total);
        }

        Ok(tokens_used)
    }

    /// Embeds `query` and returns the `top_k` most similar records.
    ///
    /// An empty store answers with no results without calling the embedder.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the query cannot be embedded, or
    /// [`RagError::DimensionMismatch`] if the backend changed dimensionality.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        self.limiter.acquire().await;
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(RagError::embedding)?;
        debug!(tokens = embedding.tokens_used, "embedded query");
        self.search_by_vector(&embedding.vector, top_k)
    }

    /// Returns the `top_k` records most similar to `vector`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `vector` has the wrong length.
    pub fn search_by_vector(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        self.index.read().search(vector, top_k)
    }
}

/// Renders search results as the context block of a prompt.
///
/// Each passage is prefixed with its page and relevance so the model can cite it.
#[must_use]
pub fn context_from_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "[Page {}] (Relevance: {}%)\n{}",
                result.page_number(),
                result.relevance_percent(),
                result.record.text
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use docent_core::Embedding;

    use super::*;
    use crate::types::RecordMetadata;

    /// Embeds text as letter counts over `a..=e`.
    #[derive(Default)]
    struct LetterEmbedder {
        calls: AtomicUsize,
    }

    impl EmbeddingModel for LetterEmbedder {
        async fn embed(&self, text: &str) -> docent_core::Result<Embedding> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut vector = vec![0.0; 5];
            for ch in text.chars() {
                if let Some(slot) = ('a'..='e').position(|c| c == ch) {
                    vector[slot] += 1.0;
                }
            }
            Ok(Embedding::new(vector, 2))
        }
    }

    fn store() -> VectorStore<LetterEmbedder> {
        VectorStore::with_rate_limit(LetterEmbedder::default(), RateLimit::unlimited(), 2)
    }

    fn chunk(id: usize, text: &str, page: usize) -> Chunk {
        Chunk {
            id,
            text: text.to_owned(),
            page_number: page,
            start_offset: 0,
            end_offset: text.chars().count(),
        }
    }

    #[tokio::test]
    async fn adds_chunks_in_order_and_counts_tokens() {
        let store = store();
        store.set_document_id(DocumentId::from("doc")).unwrap();
        let mut progress = Vec::new();

        let tokens = store
            .add_chunks_with_embeddings(
                vec![chunk(0, "aaa", 1), chunk(1, "bbb", 1), chunk(2, "ccc", 2)],
                &CancellationFlag::new(),
                |done, total| progress.push((done, total)),
            )
            .await
            .unwrap();

        assert_eq!(tokens, 6);
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.dimension(), Some(5));
        let ids: Vec<_> = store.records().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["chunk_0", "chunk_1", "chunk_2"]);
        assert!(
            store
                .records()
                .iter()
                .all(|r| r.metadata.document_id == Some(DocumentId::from("doc")))
        );
    }

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let store = store();
        store
            .add_chunks_with_embeddings(
                vec![chunk(0, "aaaa", 1), chunk(1, "bbbb", 2), chunk(2, "abab", 3)],
                &CancellationFlag::new(),
                |_, _| {},
            )
            .await
            .unwrap();

        let results = store.search("bb", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].page_number(), 2);
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(results[1].page_number(), 3);
    }

    #[tokio::test]
    async fn empty_store_skips_embedding() {
        let store = store();
        assert!(store.search("anything", 5).await.unwrap().is_empty());
        assert_eq!(store.embedder().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_flag_stops_embedding() {
        let store = store();
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let err = store
            .add_chunks_with_embeddings(vec![chunk(0, "aaa", 1)], &cancel, |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Cancelled));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let store = store();
        store.set_document_id(DocumentId::from("doc")).unwrap();
        store
            .add_record(VectorRecord::new(
                "chunk_0",
                "text",
                vec![1.0, 0.0],
                RecordMetadata {
                    page_number: 1,
                    chunk_index: 0,
                    document_id: Some(DocumentId::from("doc")),
                },
            ))
            .unwrap();

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.document_id(), None);
        assert_eq!(store.dimension(), None);
    }

    #[test]
    fn tagged_record_claims_untracked_store() {
        let store = store();
        store
            .add_record(VectorRecord::new(
                "chunk_0",
                "text",
                vec![1.0, 0.0],
                RecordMetadata {
                    page_number: 1,
                    chunk_index: 0,
                    document_id: Some(DocumentId::from("b")),
                },
            ))
            .unwrap();
        assert_eq!(store.document_id(), Some(DocumentId::from("b")));

        let err = store.set_document_id(DocumentId::from("a")).unwrap_err();
        assert!(matches!(err, RagError::DocumentMismatch { .. }));
        assert_eq!(
            store.records()[0].metadata.document_id,
            Some(DocumentId::from("b"))
        );
    }

    #[test]
    fn context_lists_pages_and_relevance() {
        let result = |text: &str, page: usize, similarity: f32| SearchResult {
            record: VectorRecord::from_chunk(chunk(0, text, page), vec![1.0], None),
            similarity,
        };
        let context = context_from_results(&[result("First.", 3, 0.87), result("Second.", 5, 0.5)]);
        assert_eq!(
            context,
            "[Page 3] (Relevance: 87%)\nFirst.\n\n---\n\n[Page 5] (Relevance: 50%)\nSecond."
        );
        assert_eq!(context_from_results(&[]), "");
    }
}
