//! Index a small in-memory document with toy backends and ask it a question.
//!
//! Run with `RUST_LOG=docent_rag=debug` to watch the pipeline.

use docent_core::{Completion, Embedding, EmbeddingModel, LLMRequest, LanguageModel, Result};
use docent_rag::{CancellationFlag, DocumentRag, RagConfig, RateLimit};
use tracing_subscriber::EnvFilter;

const DIM: usize = 16;

/// Hashes words into a fixed number of buckets.
#[derive(Clone)]
struct DemoEmbedder;

impl EmbeddingModel for DemoEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut vector = vec![0.0; DIM];
        let mut words = 0;
        for word in text.split_whitespace() {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            vector[bucket % DIM] += 1.0;
            words += 1;
        }
        Ok(Embedding::new(vector, words))
    }
}

/// Echoes the context it was given instead of calling a real model.
struct DemoModel;

impl LanguageModel for DemoModel {
    async fn respond(&self, request: LLMRequest) -> Result<Completion> {
        let turn = request
            .messages()
            .last()
            .map(|m| m.content().to_owned())
            .unwrap_or_default();
        Ok(Completion::new(format!("(demo) I was asked:\n{turn}"), 0))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RagConfig::builder()
        .chunk_size(120)
        .chunk_overlap(20)
        .min_similarity(0.1)
        .rate_limit(RateLimit::unlimited())
        .build();
    let rag = DocumentRag::with_config(DemoEmbedder, DemoModel, config)?;

    let pages = vec![
        "Retrieval-Augmented Generation uses embeddings to fetch context. \
         The most similar passages are handed to the model.",
        "Chunking splits long pages into overlapping passages. \
         Cuts prefer sentence ends so passages stay readable.",
        "",
        "Rust focuses on performance and safety using ownership and borrowing.",
    ];

    let report = rag
        .index_document_with_progress(&pages, "demo", &CancellationFlag::new(), |progress| {
            println!("[{:?}] {}", progress.stage, progress.message);
        })
        .await?;
    println!(
        "indexed {} chunks from {} pages (empty pages: {:?})",
        report.chunks, report.total_pages, report.empty_pages
    );

    let answer = rag
        .query("How are long pages split into passages?", &[], None)
        .await?;
    println!("\n{}\n", answer.answer);
    for source in &answer.sources {
        println!(
            "page {} ({:.0}%): {}",
            source.page_number,
            source.similarity * 100.0,
            source.excerpt
        );
    }

    Ok(())
}
