//! # docent
//!
//! Facade crate that re-exports everything from [`docent_core`] plus, behind features, the
//! question-answering engine and the PDF text source. Pull this crate into an application that
//! wants to let users ask questions about an open document.
//!
//! ## What's inside?
//!
//! - [`EmbeddingModel`] and [`LanguageModel`]: the two backends the engine consumes.
//! - [`DocumentSource`]: page-addressable text, implemented for in-memory pages.
//! - `rag` (default): [`DocumentRag`](rag::DocumentRag), which segments, embeds, searches and
//!   answers with page citations.
//! - `pdf`: [`PdfDocument`](pdf::PdfDocument), a [`DocumentSource`] over PDF files.
//!
//! ## Example
//!
//! ```rust,ignore
//! use docent::{pdf::PdfDocument, rag::DocumentRag};
//!
//! async fn ask(embedder: impl docent::EmbeddingModel, llm: impl docent::LanguageModel) -> docent::Result<()> {
//!     let pdf = PdfDocument::from_path("report.pdf")?;
//!     let rag = DocumentRag::new(embedder, llm);
//!     rag.index_document(&pdf, pdf.document_id().clone()).await?;
//!
//!     let answer = rag.query("What were the main findings?", &[], None).await?;
//!     println!("{}", answer.answer);
//!     Ok(())
//! }
//! ```

pub use docent_core::*;

/// Document question answering.
#[cfg(feature = "rag")]
pub use docent_rag as rag;

/// PDF text extraction.
#[cfg(feature = "pdf")]
pub use docent_pdf as pdf;
