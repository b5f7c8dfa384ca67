//! Configuration for document indexing and querying.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::limiter::RateLimit;

/// Phrase the model is told to reply with when the context has no answer.
pub const DEFAULT_NOT_FOUND_PHRASE: &str = "I couldn't find this information in the document.";

/// Configuration for a [`DocumentRag`](crate::DocumentRag) instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Target chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks of a page.
    pub chunk_overlap: usize,
    /// Passages retrieved per question.
    pub top_k: usize,
    /// Passages scoring below this are dropped before prompting.
    pub min_similarity: f32,
    /// Length of citation excerpts, in characters.
    pub excerpt_chars: usize,
    /// Cap on answer length passed to the generation backend.
    pub max_answer_tokens: Option<u32>,
    /// Reply the model gives when the document lacks the answer.
    pub not_found_phrase: String,
    /// Pacing of embedding calls.
    pub rate_limit: RateLimit,
    /// Embedding calls allowed in flight at once during indexing.
    pub embedding_concurrency: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 5,
            min_similarity: 0.3,
            excerpt_chars: 200,
            max_answer_tokens: Some(1000),
            not_found_phrase: DEFAULT_NOT_FOUND_PHRASE.to_owned(),
            rate_limit: RateLimit::default(),
            embedding_concurrency: 1,
        }
    }
}

impl RagConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::new()
    }

    /// Checks that the values can drive the segmenter and the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(RagError::InvalidConfig("top_k must be positive".into()));
        }
        if !(-1.0..=1.0).contains(&self.min_similarity) {
            return Err(RagError::InvalidConfig(format!(
                "min_similarity ({}) must lie in [-1, 1]",
                self.min_similarity
            )));
        }
        if self.embedding_concurrency == 0 {
            return Err(RagError::InvalidConfig(
                "embedding_concurrency must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for RAG configuration.
#[derive(Debug, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Creates a new configuration builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RagConfig::default(),
        }
    }

    /// Sets the target chunk length.
    #[must_use]
    pub const fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Sets the overlap between consecutive chunks.
    #[must_use]
    pub const fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Sets how many passages are retrieved per question.
    #[must_use]
    pub const fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Sets the relevance threshold.
    #[must_use]
    pub const fn min_similarity(mut self, threshold: f32) -> Self {
        self.config.min_similarity = threshold;
        self
    }

    /// Sets the citation excerpt length.
    #[must_use]
    pub const fn excerpt_chars(mut self, chars: usize) -> Self {
        self.config.excerpt_chars = chars;
        self
    }

    /// Sets the answer token cap; `None` leaves it to the backend.
    #[must_use]
    pub const fn max_answer_tokens(mut self, tokens: Option<u32>) -> Self {
        self.config.max_answer_tokens = tokens;
        self
    }

    /// Sets the reply used when the document has no answer.
    #[must_use]
    pub fn not_found_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.config.not_found_phrase = phrase.into();
        self
    }

    /// Sets the embedding rate limit.
    #[must_use]
    pub const fn rate_limit(mut self, limit: RateLimit) -> Self {
        self.config.rate_limit = limit;
        self
    }

    /// Sets how many embedding calls may run concurrently.
    #[must_use]
    pub const fn embedding_concurrency(mut self, concurrency: usize) -> Self {
        self.config.embedding_concurrency = concurrency;
        self
    }

    /// Builds the configuration without validating it.
    #[must_use]
    pub fn build(self) -> RagConfig {
        self.config
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if [`RagConfig::validate`] rejects the values.
    pub fn try_build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
