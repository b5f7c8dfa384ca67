//! End-to-end checks against PDFs generated in memory.

use docent_core::{
    Completion, DocumentId, DocumentSource, Embedding, EmbeddingModel, LLMRequest, LanguageModel,
};
use docent_pdf::{PdfDocument, PdfError};
use docent_rag::{DocumentRag, RagConfig, RateLimit, Segmenter};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Builds a PDF with one page per entry; `None` produces a page without text.
fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => Vec::new(),
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Quarterly Report"),
        "Author" => Object::string_literal("Finance Team"),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn reads_pages_in_order() {
    let bytes = build_pdf(&[Some("Revenue grew this quarter."), Some("Costs fell sharply.")]);
    let pdf = PdfDocument::from_bytes(&bytes).unwrap();

    assert_eq!(pdf.page_count(), 2);
    assert!(pdf.page_text(1).unwrap().contains("Revenue"));
    assert!(pdf.page_text(2).unwrap().contains("Costs"));
}

#[test]
fn out_of_range_pages_error() {
    let pdf = PdfDocument::from_bytes(build_pdf(&[Some("Only page.")])).unwrap();

    assert!(matches!(
        pdf.page_text(0),
        Err(PdfError::PageOutOfRange { page: 0, .. })
    ));
    assert!(matches!(
        pdf.page_text(2),
        Err(PdfError::PageOutOfRange {
            page: 2,
            page_count: 1
        })
    ));
    assert!(DocumentSource::page_text(&pdf, 2).is_err());
}

#[test]
fn page_without_text_is_empty() {
    let pdf = PdfDocument::from_bytes(build_pdf(&[Some("Some words."), None])).unwrap();

    assert!(pdf.page_text(2).unwrap().trim().is_empty());
    let segmented = Segmenter::default().extract_and_chunk(&pdf).unwrap();
    assert_eq!(segmented.empty_pages, vec![2]);
    assert!(segmented.chunks.iter().all(|c| c.page_number == 1));
}

#[test]
fn identity_follows_bytes() {
    let bytes = build_pdf(&[Some("Same content.")]);
    let first = PdfDocument::from_bytes(&bytes).unwrap();
    let second = PdfDocument::from_bytes(&bytes).unwrap();

    assert_eq!(first.document_id(), second.document_id());
    assert_eq!(first.document_id(), &DocumentId::from_content(&bytes));
}

#[test]
fn reads_information_dictionary() {
    let pdf = PdfDocument::from_bytes(build_pdf(&[Some("Body.")])).unwrap();
    let meta = pdf.metadata();

    assert_eq!(meta.title.as_deref(), Some("Quarterly Report"));
    assert_eq!(meta.author.as_deref(), Some("Finance Team"));
}

const WORDS: &[&str] = &["revenue", "quarter", "costs", "fell"];

/// Counts occurrences of [`WORDS`].
struct WordCounter;

impl EmbeddingModel for WordCounter {
    async fn embed(&self, text: &str) -> docent_core::Result<Embedding> {
        let mut vector = vec![0.0; WORDS.len()];
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            if let Some(slot) = WORDS.iter().position(|w| w.eq_ignore_ascii_case(word)) {
                vector[slot] += 1.0;
            }
        }
        Ok(Embedding::new(vector, 1))
    }
}

struct Echo;

impl LanguageModel for Echo {
    async fn respond(&self, _request: LLMRequest) -> docent_core::Result<Completion> {
        Ok(Completion::new("Costs fell (Page 2).", 5))
    }
}

#[tokio::test]
async fn pdf_answers_cite_its_pages() {
    let bytes = build_pdf(&[
        Some("Revenue grew this quarter."),
        Some("Costs fell sharply."),
        None,
    ]);
    let pdf = PdfDocument::from_bytes(&bytes).unwrap();
    let config = RagConfig::builder()
        .rate_limit(RateLimit::unlimited())
        .build();
    let rag = DocumentRag::with_config(WordCounter, Echo, config).unwrap();

    let report = rag
        .index_document(&pdf, pdf.document_id().clone())
        .await
        .unwrap();
    assert_eq!(report.total_pages, 3);
    assert_eq!(report.chunks, 2);
    assert_eq!(report.empty_pages, vec![3]);
    assert!(rag.is_document_indexed(pdf.document_id()));

    let answer = rag.query("Which costs fell?", &[], None).await.unwrap();
    let pages: Vec<_> = answer.sources.iter().map(|s| s.page_number).collect();
    assert_eq!(pages, vec![2]);
    assert!(answer.sources[0].excerpt.contains("Costs fell"));
}
