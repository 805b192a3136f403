//! Provider-agnostic chat types: conversation turns, stream events and the
//! snapshots handed to a renderer.
//!
//! Backends translate their wire format into [`StreamEvent`]s; everything
//! downstream of that (accumulation, throttling, the chat session) only ever
//! sees the types in this module.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single message of a conversation.
///
/// An assistant turn with empty `text` is the placeholder for a response that
/// is still streaming in. See [`crate::session::Conversation`] for the rules
/// around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Empty assistant turn standing in for an in-flight response.
    pub fn placeholder() -> Self {
        Self::new(Role::Assistant, String::new())
    }

    pub fn is_placeholder(&self) -> bool {
        self.role == Role::Assistant && self.text.is_empty()
    }
}

/// Chat roles understood by every supported backend.
///
/// The `Display` implementation renders the canonical lowercase name so you
/// can feed it directly into JSON without extra mapping logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One unit produced by an event source.
///
/// `End` and `Error` are terminal. A `Delta` with both fragments absent is a
/// heartbeat and carries no information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta {
        answer: Option<String>,
        reasoning: Option<String>,
    },
    End,
    Error {
        message: String,
    },
}

impl StreamEvent {
    pub fn answer(fragment: impl Into<String>) -> Self {
        StreamEvent::Delta {
            answer: Some(fragment.into()),
            reasoning: None,
        }
    }

    pub fn reasoning(fragment: impl Into<String>) -> Self {
        StreamEvent::Delta {
            answer: None,
            reasoning: Some(fragment.into()),
        }
    }

    pub fn heartbeat() -> Self {
        StreamEvent::Delta {
            answer: None,
            reasoning: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }
}

/// Full picture of a response at one point in time.
///
/// Consumers replace whatever they display with the snapshot; it is never a
/// delta on top of the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub answer_text: String,
    pub reasoning_text: String,
    pub is_final: bool,
    pub error_message: Option<String>,
}

impl Snapshot {
    /// `true` for the terminal snapshot of a run that ended normally.
    pub fn is_success(&self) -> bool {
        self.is_final && self.error_message.is_none()
    }
}
