//! # Embedding Module
//!
//! Embeddings are dense vector representations of text that capture semantic meaning.
//! Similar texts produce similar vectors, which is what retrieval relies on: a question and the
//! passage that answers it should land close together.
//!
//! The [`EmbeddingModel`] trait abstracts over embedding backends. Backends report the token
//! cost of every call alongside the vector, so callers can keep usage accounting without knowing
//! anything about the provider.
//!
//! ```rust
//! use docent_core::{EmbeddingModel, embedding::Embedding};
//!
//! async fn example<T: EmbeddingModel>(model: &T) -> docent_core::Result<()> {
//!     let Embedding { vector, tokens_used } = model.embed("Hello, world!").await?;
//!     println!("{} dimensions for {tokens_used} tokens", vector.len());
//!     Ok(())
//! }
//! ```

use core::future::Future;
use std::sync::Arc;

/// The vector produced for one input string, plus what it cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Embedding {
    /// Dense vector. Its length is fixed for a given backend and model.
    pub vector: Vec<f32>,
    /// Tokens billed by the backend for this call.
    pub tokens_used: u64,
}

impl Embedding {
    /// Creates an embedding result.
    #[must_use]
    pub const fn new(vector: Vec<f32>, tokens_used: u64) -> Self {
        Self {
            vector,
            tokens_used,
        }
    }

    /// Returns the dimensionality of the vector.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// Converts text to vector representations.
///
/// Implementations are expected to return vectors of the same length for every call. Network
/// timeouts, rate limits and malformed responses are reported as errors; an implementation must
/// never return an empty vector to signal failure.
///
/// # Example
///
/// ```rust
/// use docent_core::{EmbeddingModel, embedding::Embedding};
///
/// struct Constant;
///
/// impl EmbeddingModel for Constant {
///     async fn embed(&self, text: &str) -> docent_core::Result<Embedding> {
///         Ok(Embedding::new(vec![1.0, 0.0, 0.0], text.len() as u64))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let embedding = Constant.embed("The quick brown fox").await.unwrap();
/// assert_eq!(embedding.dim(), 3);
/// # });
/// ```
pub trait EmbeddingModel: Send + Sync {
    /// Converts text to an embedding vector.
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Embedding>> + Send;

    /// Whether a backend is actually available behind this model.
    ///
    /// Callers check this before starting work so a missing backend is reported before any
    /// request goes out.
    fn is_configured(&self) -> bool {
        true
    }
}

macro_rules! impl_embedding_model {
    ($($name:ident),*) => {
        $(
            impl<T: EmbeddingModel> EmbeddingModel for $name<T> {
                fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Embedding>> + Send {
                    T::embed(self, text)
                }

                fn is_configured(&self) -> bool {
                    T::is_configured(self)
                }
            }
        )*
    };
}

impl_embedding_model!(Arc, Box);

impl<T: EmbeddingModel> EmbeddingModel for &T {
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Embedding>> + Send {
        T::embed(self, text)
    }

    fn is_configured(&self) -> bool {
        T::is_configured(self)
    }
}
