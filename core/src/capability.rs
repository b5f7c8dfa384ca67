//! Backend slots resolved once from configuration.
//!
//! An application picks its embedding and generation backends when it starts (or when the user
//! changes settings) and stores the outcome in a [`Capability`]. The engine then talks to the
//! slot through the ordinary [`EmbeddingModel`] / [`LanguageModel`] traits. An empty slot fails
//! every call with [`NotConfigured`] before doing any work, and reports itself through
//! `is_configured()` so callers can refuse to start at all.

use core::future::Future;

use crate::embedding::{Embedding, EmbeddingModel};
use crate::llm::{Completion, LLMRequest, LanguageModel};

/// Raised when a capability is used without a backend behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{capability} backend is not configured")]
pub struct NotConfigured {
    /// Name of the missing capability, e.g. `"embedding"`.
    pub capability: &'static str,
}

impl NotConfigured {
    /// Creates the marker for a named capability.
    #[must_use]
    pub const fn new(capability: &'static str) -> Self {
        Self { capability }
    }

    /// Returns the marker if `error` (or anything in its source chain) is one.
    #[must_use]
    pub fn find(error: &crate::Error) -> Option<Self> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<Self>())
            .copied()
    }
}

/// A capability slot: either a resolved backend or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    /// A backend is available.
    Ready(T),
    /// No backend was selected (missing credentials, no provider chosen).
    Unconfigured {
        /// Name used in the resulting [`NotConfigured`] error.
        capability: &'static str,
    },
}

impl<T> Capability<T> {
    /// Unconfigured embedding slot.
    #[must_use]
    pub const fn no_embedding() -> Self {
        Self::Unconfigured {
            capability: "embedding",
        }
    }

    /// Unconfigured generation slot.
    #[must_use]
    pub const fn no_generation() -> Self {
        Self::Unconfigured {
            capability: "generation",
        }
    }

    /// Wraps an optional backend, naming the capability when it is absent.
    pub fn from_option(backend: Option<T>, capability: &'static str) -> Self {
        backend.map_or(Self::Unconfigured { capability }, Self::Ready)
    }

    /// Returns the backend if one is available.
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(backend) => Some(backend),
            Self::Unconfigured { .. } => None,
        }
    }
}

impl<T: EmbeddingModel> EmbeddingModel for Capability<T> {
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Embedding>> + Send {
        async move {
            match self {
                Self::Ready(backend) => backend.embed(text).await,
                Self::Unconfigured { capability } => Err(NotConfigured::new(*capability).into()),
            }
        }
    }

    fn is_configured(&self) -> bool {
        matches!(self, Self::Ready(backend) if backend.is_configured())
    }
}

impl<T: LanguageModel> LanguageModel for Capability<T> {
    fn respond(&self, request: LLMRequest) -> impl Future<Output = crate::Result<Completion>> + Send {
        async move {
            match self {
                Self::Ready(backend) => backend.respond(request).await,
                Self::Unconfigured { capability } => Err(NotConfigured::new(*capability).into()),
            }
        }
    }

    fn is_configured(&self) -> bool {
        matches!(self, Self::Ready(backend) if backend.is_configured())
    }
}
