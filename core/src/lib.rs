//! # docent-core
//!
//! Capability traits consumed by the document question-answering engine.
//!
//! The engine never talks to a network client directly. It consumes three capabilities and
//! every backend or document format plugs in by implementing one of them:
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   docent-rag    │───▶│   docent-core    │◀───│    Adapters     │
//! │                 │    │   (this crate)   │    │                 │
//! │ - segmentation  │    │ - EmbeddingModel │    │ - HTTP clients  │
//! │ - vector store  │    │ - LanguageModel  │    │ - local models  │
//! │ - query answers │    │ - DocumentSource │    │ - PDF readers   │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! | Capability | Trait | Description |
//! |------------|-------|-------------|
//! | **Embeddings** | [`EmbeddingModel`] | Text to vector, with token cost |
//! | **Generation** | [`LanguageModel`] | Role-tagged conversation to answer, with token cost |
//! | **Document text** | [`DocumentSource`] | Page count and per-page text |
//!
//! Backends are resolved once into a [`Capability`] slot; an empty slot fails fast with
//! [`NotConfigured`].

pub mod capability;
pub mod document;
pub mod embedding;
pub mod llm;

#[doc(inline)]
pub use capability::{Capability, NotConfigured};
#[doc(inline)]
pub use document::{DocumentId, DocumentSource};
#[doc(inline)]
pub use embedding::{Embedding, EmbeddingModel};
#[doc(inline)]
pub use llm::{Completion, LLMRequest, LanguageModel, Message, Role};

/// Result type used at the capability boundary.
///
/// Type alias for [`anyhow::Result<T>`](anyhow::Result).
pub type Result<T> = anyhow::Result<T>;

pub use anyhow::Error;
