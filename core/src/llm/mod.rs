//! # Language Models and Conversation Management
//!
//! Provider-agnostic text generation. A [`LanguageModel`] receives an [`LLMRequest`] (a list of
//! role-tagged [`Message`]s plus an optional output budget) and resolves to a [`Completion`]
//! carrying the response text and its token cost.
//!
//! ## Multi-turn Conversation
//!
//! ```rust
//! use docent_core::llm::{LLMRequest, Message};
//!
//! let request = LLMRequest::new([
//!     Message::system("You are a helpful assistant"),
//!     Message::user("What's the capital of Japan?"),
//!     Message::assistant("Tokyo."),
//!     Message::user("And its population?"),
//! ])
//! .with_max_tokens(256);
//!
//! assert_eq!(request.messages().len(), 4);
//! ```

pub mod message;

use core::future::Future;
use std::sync::Arc;

pub use message::{Message, Role};

/// A generation request: the full conversation to answer, newest turn last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LLMRequest {
    messages: Vec<Message>,
    max_tokens: Option<u32>,
}

impl LLMRequest {
    /// Creates a request from a list of messages.
    pub fn new(messages: impl Into<Vec<Message>>) -> Self {
        Self {
            messages: messages.into(),
            max_tokens: None,
        }
    }

    /// Caps the number of tokens the backend may generate.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets or clears the output token cap.
    #[must_use]
    pub const fn with_max_tokens_opt(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Messages in conversation order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Output token cap, if any.
    #[must_use]
    pub const fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Splits the request into its messages and token cap.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Message>, Option<u32>) {
        (self.messages, self.max_tokens)
    }
}

/// The text a backend generated and what it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Completion {
    /// Generated text.
    pub content: String,
    /// Tokens billed for the call (prompt and completion combined).
    pub tokens_used: u64,
}

impl Completion {
    /// Creates a completion.
    pub fn new(content: impl Into<String>, tokens_used: u64) -> Self {
        Self {
            content: content.into(),
            tokens_used,
        }
    }
}

/// Generates a response to a conversation.
///
/// Every call is awaited to completion; streaming is left to the adapters that need it.
pub trait LanguageModel: Send + Sync {
    /// Answers the conversation carried by `request`.
    fn respond(&self, request: LLMRequest) -> impl Future<Output = crate::Result<Completion>> + Send;

    /// Whether a backend is actually available behind this model.
    fn is_configured(&self) -> bool {
        true
    }
}

macro_rules! impl_language_model {
    ($($name:ident),*) => {
        $(
            impl<T: LanguageModel> LanguageModel for $name<T> {
                fn respond(
                    &self,
                    request: LLMRequest,
                ) -> impl Future<Output = crate::Result<Completion>> + Send {
                    T::respond(self, request)
                }

                fn is_configured(&self) -> bool {
                    T::is_configured(self)
                }
            }
        )*
    };
}

impl_language_model!(Arc, Box);

impl<T: LanguageModel> LanguageModel for &T {
    fn respond(&self, request: LLMRequest) -> impl Future<Output = crate::Result<Completion>> + Send {
        T::respond(self, request)
    }

    fn is_configured(&self) -> bool {
        T::is_configured(self)
    }
}

/// Builds a two-turn request: one system instruction and one user message.
pub fn oneshot(system: impl Into<String>, user: impl Into<String>) -> LLMRequest {
    LLMRequest::new(vec![Message::system(system), Message::user(user)])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl LanguageModel for Echo {
        async fn respond(&self, request: LLMRequest) -> crate::Result<Completion> {
            let last = request
                .messages()
                .last()
                .map(|m| m.content().to_owned())
                .unwrap_or_default();
            Ok(Completion::new(last, u64::from(request.max_tokens().unwrap_or(0))))
        }
    }

    #[test]
    fn oneshot_builds_system_then_user() {
        let request = oneshot("be brief", "hello");
        assert_eq!(request.messages()[0].role(), Role::System);
        assert_eq!(request.messages()[1].role(), Role::User);
        assert_eq!(request.max_tokens(), None);
    }

    #[tokio::test]
    async fn respond_through_wrappers() {
        let model = Arc::new(Echo);
        let request = oneshot("sys", "ping").with_max_tokens(7);

        let completion = model.respond(request.clone()).await.unwrap();
        assert_eq!(completion.content, "ping");
        assert_eq!(completion.tokens_used, 7);

        let boxed: Box<Echo> = Box::new(Echo);
        assert_eq!(boxed.respond(request).await.unwrap().content, "ping");
    }

    #[test]
    fn into_parts_round_trips() {
        let (messages, max) = LLMRequest::new([Message::user("x")])
            .with_max_tokens_opt(Some(3))
            .into_parts();
        assert_eq!(messages, vec![Message::user("x")]);
        assert_eq!(max, Some(3));
    }
}
