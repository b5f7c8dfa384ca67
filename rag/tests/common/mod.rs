//! Deterministic backends shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use docent_core::{Completion, DocumentSource, Embedding, EmbeddingModel, LLMRequest, LanguageModel};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Words the embedder knows; everything else is ignored.
pub const VOCABULARY: &[&str] = &[
    "rust", "ownership", "borrowing", "compiler", "memory", "safety", "lifetimes", "traits",
    "revenue", "quarter", "profit", "costs", "growth", "market", "solar", "panels", "energy",
    "battery",
];

/// Bag-of-words embedding over [`VOCABULARY`].
///
/// Text without known words embeds to the zero vector, which is similar to nothing.
#[derive(Debug, Default)]
pub struct VocabularyEmbedder {
    pub calls: AtomicUsize,
    /// Fail the call with this 1-based index.
    pub fail_on_call: Option<usize>,
}

impl VocabularyEmbedder {
    pub fn failing_on(call: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_call: Some(call),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn embed_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; VOCABULARY.len()];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        if let Some(slot) = VOCABULARY.iter().position(|known| *known == word) {
            vector[slot] += 1.0;
        }
    }
    vector
}

impl EmbeddingModel for VocabularyEmbedder {
    async fn embed(&self, text: &str) -> docent_core::Result<Embedding> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            anyhow::bail!("embedding service returned 503");
        }
        let tokens = text.split_whitespace().count() as u64;
        Ok(Embedding::new(embed_words(text), tokens))
    }
}

/// Embedder that parks every call until [`GatedEmbedder::open`] is called.
#[derive(Debug, Default)]
pub struct GatedEmbedder {
    open: AtomicBool,
    gate: Notify,
}

impl GatedEmbedder {
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.gate.notify_one();
    }
}

impl EmbeddingModel for GatedEmbedder {
    async fn embed(&self, text: &str) -> docent_core::Result<Embedding> {
        if !self.open.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        Ok(Embedding::new(embed_words(text), 1))
    }
}

/// Language model that records every request and answers with a fixed reply.
#[derive(Debug, Clone, Default)]
pub struct RecordingModel {
    pub requests: Arc<Mutex<Vec<LLMRequest>>>,
}

impl RecordingModel {
    pub fn last_request(&self) -> Option<LLMRequest> {
        self.requests.lock().last().cloned()
    }
}

impl LanguageModel for RecordingModel {
    async fn respond(&self, request: LLMRequest) -> docent_core::Result<Completion> {
        self.requests.lock().push(request);
        Ok(Completion::new("Answer from context (Page 1).", 17))
    }
}

/// Document whose pages fail to extract from a given page on.
#[derive(Debug)]
pub struct BrokenDocument {
    pub pages: Vec<String>,
    pub broken_page: usize,
}

impl DocumentSource for BrokenDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page_number: usize) -> docent_core::Result<String> {
        if page_number == self.broken_page {
            anyhow::bail!("corrupt content stream");
        }
        self.pages.page_text(page_number)
    }
}
