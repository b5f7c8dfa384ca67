//! High-level document question-answering engine.

use std::fmt;
use std::sync::Arc;

use async_lock::RwLock;
use docent_core::{DocumentId, DocumentSource, EmbeddingModel, LanguageModel, Message, NotConfigured};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::chunking::Segmenter;
use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::indexing::{CancellationFlag, IndexReport, IndexState, IndexingProgress};
use crate::prompt::PromptBuilder;
use crate::store::{VectorStore, context_from_results};
use crate::types::{RagAnswer, SearchResult, SourceCitation};

/// Indexes one document at a time and answers questions about it.
///
/// An indexing run owns the store for its whole duration. Queries issued meanwhile
/// fail with [`RagError::IndexingInProgress`] rather than seeing a half-built index,
/// and a failed or cancelled run leaves the store empty.
///
/// Clones share the same store and state.
pub struct DocumentRag<M, L> {
    store: VectorStore<M>,
    llm: Arc<L>,
    segmenter: Segmenter,
    prompts: PromptBuilder,
    config: RagConfig,
    state: Arc<Mutex<IndexState>>,
    guard: Arc<RwLock<()>>,
}

impl<M, L> Clone for DocumentRag<M, L> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            llm: Arc::clone(&self.llm),
            segmenter: self.segmenter,
            prompts: self.prompts.clone(),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            guard: Arc::clone(&self.guard),
        }
    }
}

impl<M, L> fmt::Debug for DocumentRag<M, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRag")
            .field("store", &self.store)
            .field("state", &*self.state.lock())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<M, L> DocumentRag<M, L>
where
    M: EmbeddingModel,
    L: LanguageModel,
{
    /// Creates an engine with default configuration.
    pub fn new(embedder: M, llm: L) -> Self {
        let config = RagConfig::default();
        let segmenter = Segmenter::new(config.chunk_size, config.chunk_overlap);
        Self::assemble(embedder, llm, config, segmenter)
    }

    /// Creates an engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if the configuration does not validate.
    pub fn with_config(embedder: M, llm: L, config: RagConfig) -> Result<Self> {
        let segmenter = Segmenter::from_config(&config)?;
        Ok(Self::assemble(embedder, llm, config, segmenter))
    }

    fn assemble(embedder: M, llm: L, config: RagConfig, segmenter: Segmenter) -> Self {
        Self {
            store: VectorStore::with_rate_limit(
                embedder,
                config.rate_limit,
                config.embedding_concurrency,
            ),
            llm: Arc::new(llm),
            segmenter,
            prompts: PromptBuilder::new(config.not_found_phrase.clone()),
            config,
            state: Arc::new(Mutex::new(IndexState::NotIndexed)),
            guard: Arc::new(RwLock::new(())),
        }
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The underlying vector store.
    #[must_use]
    pub const fn store(&self) -> &VectorStore<M> {
        &self.store
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn index_state(&self) -> IndexState {
        self.state.lock().clone()
    }

    /// Document the store currently belongs to.
    #[must_use]
    pub fn document_id(&self) -> Option<DocumentId> {
        self.store.document_id()
    }

    /// Whether `id` is fully indexed and ready for questions.
    ///
    /// A document without any text is never considered indexed.
    #[must_use]
    pub fn is_document_indexed(&self, id: &DocumentId) -> bool {
        *self.state.lock() == IndexState::Indexed
            && !self.store.is_empty()
            && self.store.document_id().as_ref() == Some(id)
    }

    /// Indexes `source` as document `document_id`.
    ///
    /// # Errors
    ///
    /// See [`index_document_with_progress`](Self::index_document_with_progress).
    pub async fn index_document<D>(
        &self,
        source: &D,
        document_id: impl Into<DocumentId>,
    ) -> Result<IndexReport>
    where
        D: DocumentSource + ?Sized,
    {
        self.index_document_with_progress(source, document_id, &CancellationFlag::new(), |_| {})
            .await
    }

    /// Indexes `source`, reporting progress and honouring `cancel`.
    ///
    /// The store is emptied first, so records of a previous document (or a previous
    /// run over the same document) never survive. Runs are serialized.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotConfigured`] if no embedding backend is configured
    /// - [`RagError::Extraction`] if a page's text cannot be read
    /// - [`RagError::Embedding`] if the embedding backend fails
    /// - [`RagError::Cancelled`] if `cancel` is raised before the run completes
    ///
    /// On any error the store is cleared; the state becomes [`IndexState::Failed`], or
    /// [`IndexState::NotIndexed`] after cancellation.
    pub async fn index_document_with_progress<D, F>(
        &self,
        source: &D,
        document_id: impl Into<DocumentId>,
        cancel: &CancellationFlag,
        mut on_progress: F,
    ) -> Result<IndexReport>
    where
        D: DocumentSource + ?Sized,
        F: FnMut(IndexingProgress),
    {
        let document_id = document_id.into();
        let _guard = self.guard.write().await;

        if let Some(previous) = self.store.document_id() {
            if previous != document_id {
                debug!(%previous, current = %document_id, "switching document");
            }
        }
        self.store.clear();
        self.store.set_document_id(document_id.clone())?;
        self.set_state(IndexState::Extracting);
        info!(document = %document_id, "indexing started");

        match self
            .run_index(source, &document_id, cancel, &mut on_progress)
            .await
        {
            Ok(report) => {
                self.set_state(IndexState::Indexed);
                info!(
                    document = %document_id,
                    chunks = report.chunks,
                    tokens = report.tokens_used,
                    "indexing finished"
                );
                Ok(report)
            }
            Err(err) => {
                self.store.clear();
                if matches!(err, RagError::Cancelled) {
                    self.set_state(IndexState::NotIndexed);
                    info!(document = %document_id, "indexing cancelled");
                } else {
                    self.set_state(IndexState::Failed {
                        message: err.to_string(),
                    });
                    warn!(document = %document_id, error = %err, "indexing failed");
                }
                Err(err)
            }
        }
    }

    async fn run_index<D, F>(
        &self,
        source: &D,
        document_id: &DocumentId,
        cancel: &CancellationFlag,
        on_progress: &mut F,
    ) -> Result<IndexReport>
    where
        D: DocumentSource + ?Sized,
        F: FnMut(IndexingProgress),
    {
        if !self.store.embedder().is_configured() {
            return Err(NotConfigured::new("embedding").into());
        }
        if cancel.is_cancelled() {
            return Err(RagError::Cancelled);
        }

        let segmented = self.segmenter.extract_and_chunk(source)?;
        let chunk_count = segmented.chunks.len();
        if !segmented.empty_pages.is_empty() {
            info!(pages = ?segmented.empty_pages, "pages without extractable text");
        }
        on_progress(IndexingProgress::extracted(segmented.total_pages, chunk_count));

        self.set_state(IndexState::Embedding);
        let tokens_used = self
            .store
            .add_chunks_with_embeddings(segmented.chunks, cancel, |current, total| {
                on_progress(IndexingProgress::embedded(current, total));
            })
            .await?;

        on_progress(IndexingProgress::complete(chunk_count));
        Ok(IndexReport {
            document_id: document_id.clone(),
            total_pages: segmented.total_pages,
            total_characters: segmented.total_characters,
            chunks: chunk_count,
            empty_pages: segmented.empty_pages,
            tokens_used,
        })
    }

    /// Answers `question` from the indexed document.
    ///
    /// `history` holds earlier turns of the conversation; `language` asks the model to
    /// answer in that language. Only passages at or above
    /// [`RagConfig::min_similarity`] reach the model, and exactly those are cited.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexingInProgress`] while a run owns the store
    /// - [`RagError::NotIndexed`] if no document with text is indexed
    /// - [`RagError::NotConfigured`] if a backend is missing
    /// - [`RagError::Embedding`] / [`RagError::Generation`] on backend failures
    pub async fn query(
        &self,
        question: &str,
        history: &[Message],
        language: Option<&str>,
    ) -> Result<RagAnswer> {
        let _guard = self.guard.try_read().ok_or(RagError::IndexingInProgress)?;
        self.ensure_indexed()?;
        self.answer(question, history, language).await
    }

    /// Like [`query`](Self::query), but also checks that the store holds `document_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentMismatch`] if another document is indexed, otherwise
    /// the errors of [`query`](Self::query).
    pub async fn query_document(
        &self,
        document_id: &DocumentId,
        question: &str,
        history: &[Message],
        language: Option<&str>,
    ) -> Result<RagAnswer> {
        let _guard = self.guard.try_read().ok_or(RagError::IndexingInProgress)?;
        self.ensure_indexed()?;
        if let Some(expected) = self.store.document_id() {
            if &expected != document_id {
                return Err(RagError::DocumentMismatch {
                    expected,
                    actual: document_id.clone(),
                });
            }
        }
        self.answer(question, history, language).await
    }

    async fn answer(
        &self,
        question: &str,
        history: &[Message],
        language: Option<&str>,
    ) -> Result<RagAnswer> {
        if !self.llm.is_configured() {
            return Err(NotConfigured::new("generation").into());
        }

        let results = self.store.search(question, self.config.top_k).await?;
        let retrieved = results.len();
        let relevant: Vec<SearchResult> = results
            .into_iter()
            .filter(|result| result.similarity >= self.config.min_similarity)
            .collect();
        debug!(retrieved, relevant = relevant.len(), "retrieved passages");

        let context = context_from_results(&relevant);
        let request = self
            .prompts
            .build(&context, question, history, language)
            .with_max_tokens_opt(self.config.max_answer_tokens);
        let completion = self
            .llm
            .respond(request)
            .await
            .map_err(RagError::generation)?;
        debug!(tokens = completion.tokens_used, "generated answer");

        Ok(RagAnswer {
            answer: completion.content,
            sources: relevant
                .iter()
                .map(|result| SourceCitation::from_result(result, self.config.excerpt_chars))
                .collect(),
            tokens_used: completion.tokens_used,
        })
    }

    /// Returns the `top_k` passages most similar to `query` without generating an answer.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexingInProgress`] while a run owns the store
    /// - [`RagError::NotIndexed`] if no document with text is indexed
    /// - [`RagError::Embedding`] if the query cannot be embedded
    pub async fn semantic_search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let _guard = self.guard.try_read().ok_or(RagError::IndexingInProgress)?;
        self.ensure_indexed()?;
        self.store.search(query, top_k).await
    }

    /// Drops the index and forgets the document.
    ///
    /// Waits for an in-flight indexing run to finish first.
    pub async fn clear(&self) {
        let _guard = self.guard.write().await;
        self.store.clear();
        self.set_state(IndexState::NotIndexed);
    }

    fn ensure_indexed(&self) -> Result<()> {
        if *self.state.lock() != IndexState::Indexed || self.store.is_empty() {
            return Err(RagError::NotIndexed);
        }
        Ok(())
    }

    fn set_state(&self, state: IndexState) {
        *self.state.lock() = state;
    }
}
