//! Question answering over a single document.
//!
//! The [`DocumentRag`] engine glues any [`EmbeddingModel`](docent_core::EmbeddingModel) and
//! [`LanguageModel`](docent_core::LanguageModel) to an in-memory vector index, exposing a small
//! API surface:
//! - [`DocumentRag::index_document`] – segment, embed and store a document's pages.
//! - [`DocumentRag::query`] – retrieve the best passages and have the model answer from them,
//!   with page citations.
//! - [`DocumentRag::semantic_search`] – retrieval only.
//!
//! The index scores every stored chunk with a parallel iterator. A single document holds a few
//! hundred chunks at most, so exhaustive search stays fast and exact.
//!
//! ```rust,no_run
//! use docent_rag::DocumentRag;
//! # use docent_core::{Completion, Embedding, EmbeddingModel, LLMRequest, LanguageModel};
//! # struct Embedder;
//! # impl EmbeddingModel for Embedder {
//! #     async fn embed(&self, _: &str) -> docent_core::Result<Embedding> { Ok(Embedding::new(vec![1.0], 1)) }
//! # }
//! # struct Model;
//! # impl LanguageModel for Model {
//! #     async fn respond(&self, _: LLMRequest) -> docent_core::Result<Completion> { Ok(Completion::new("", 0)) }
//! # }
//!
//! # async fn run() -> docent_rag::Result<()> {
//! let rag = DocumentRag::new(Embedder, Model);
//! let pages = vec!["Page one text.", "Page two text."];
//! rag.index_document(&pages, "notes").await?;
//!
//! let answer = rag.query("What is on page two?", &[], None).await?;
//! for source in &answer.sources {
//!     println!("page {} ({:.0}%)", source.page_number, source.similarity * 100.0);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunking;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod index;
pub mod indexing;
pub mod limiter;
pub mod prompt;
pub mod rag;
pub mod store;
pub mod types;

pub use chunking::Segmenter;
pub use cleaning::normalize_whitespace;
pub use config::{RagConfig, RagConfigBuilder};
pub use error::{RagError, Result};
pub use index::cosine_similarity;
pub use indexing::{CancellationFlag, IndexReport, IndexStage, IndexState, IndexingProgress};
pub use limiter::{RateLimit, TokenBucket};
pub use prompt::PromptBuilder;
pub use rag::DocumentRag;
pub use store::{VectorStore, context_from_results};
pub use types::{
    Chunk, RagAnswer, RecordMetadata, SearchResult, SegmentedDocument, SourceCitation,
    VectorRecord,
};
