//! Prompt assembly for grounded answers.

use docent_core::{LLMRequest, Message};

use crate::config::DEFAULT_NOT_FOUND_PHRASE;

/// Placeholder used as context when no passage passed the relevance gate.
pub const NO_RELEVANT_PASSAGES: &str = "(No passages of the document matched this question.)";

/// Builds the conversation sent to the generation backend.
///
/// The system instruction restricts the model to the supplied context, fixes the
/// reply for unanswerable questions and asks for page citations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    not_found_phrase: String,
}

impl PromptBuilder {
    /// Creates a builder that tells the model to answer `not_found_phrase` when the
    /// document lacks the answer.
    pub fn new(not_found_phrase: impl Into<String>) -> Self {
        Self {
            not_found_phrase: not_found_phrase.into(),
        }
    }

    /// The reply the model is told to use for unanswerable questions.
    #[must_use]
    pub fn not_found_phrase(&self) -> &str {
        &self.not_found_phrase
    }

    /// System instruction, optionally asking for answers in `language`.
    #[must_use]
    pub fn system_instruction(&self, language: Option<&str>) -> String {
        let mut instruction = format!(
            "You are an assistant answering questions about a document.\n\
             Answer ONLY with information from the context passages below.\n\
             If the context does not contain the answer, reply exactly: \"{}\"\n\
             Cite the page numbers you used, for example (Page 3).\n\
             Keep answers concise and accurate.",
            self.not_found_phrase
        );
        if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
            instruction.push_str(&format!("\nRespond in {language}."));
        }
        instruction
    }

    /// Final user turn carrying the context block and the question.
    #[must_use]
    pub fn user_turn(&self, context: &str, question: &str) -> String {
        let context = if context.trim().is_empty() {
            NO_RELEVANT_PASSAGES
        } else {
            context
        };
        format!("Context from the document:\n\n{context}\n\nQuestion: {question}")
    }

    /// Full request: instruction, prior turns, then context and question.
    #[must_use]
    pub fn build(
        &self,
        context: &str,
        question: &str,
        history: &[Message],
        language: Option<&str>,
    ) -> LLMRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_instruction(language)));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(self.user_turn(context, question)));
        LLMRequest::new(messages)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NOT_FOUND_PHRASE)
    }
}
