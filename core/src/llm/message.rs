//! Message types for conversations with a generation backend.
//!
//! Messages are an enum with one variant per role, so a conversation history is simply a
//! `Vec<Message>`.

/// Conversation participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    /// Input from the human user.
    User,
    /// Responses produced by the model.
    Assistant,
    /// Instructions that steer the model.
    System,
}

impl Role {
    /// Lowercase wire name of the role (`system`, `user`, `assistant`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "role", rename_all = "snake_case"))]
pub enum Message {
    /// User turn.
    User {
        /// Text content of the message.
        content: String,
    },
    /// Assistant turn.
    Assistant {
        /// Text content of the message.
        content: String,
    },
    /// System instruction.
    System {
        /// Text content of the message.
        content: String,
    },
}

impl Message {
    /// Returns the message sender role.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::System { .. } => Role::System,
        }
    }

    /// Returns the text content of the message.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::User { content } | Self::Assistant { content } | Self::System { content } => {
                content
            }
        }
    }

    /// Creates a message for an arbitrary role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        let content = content.into();
        match role {
            Role::User => Self::User { content },
            Role::Assistant => Self::Assistant { content },
            Role::System => Self::System { content },
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Creates a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
        }
    }

    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }
}
