use chatterbox_core::config::ReasoningEffort;
use chatterbox_core::generic::{ConversationTurn, Role};
use chatterbox_core::model::ReasoningFormat;
use chatterbox_core::provider::ChatRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_format: Option<ReasoningFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl From<ChatRequest> for ChatCompletionRequest {
    fn from(value: ChatRequest) -> Self {
        Self {
            model: value.model,
            messages: value.messages.into_iter().map(Into::into).collect(),
            temperature: Some(value.temperature),
            max_tokens: Some(value.max_tokens),
            top_p: value.extras.top_p,
            reasoning_effort: value.extras.reasoning_effort,
            reasoning_format: value.extras.reasoning_format,
            stream: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<Role> for MessageRole {
    fn from(value: Role) -> Self {
        match value {
            Role::System => MessageRole::System,
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

impl From<ConversationTurn> for ChatCompletionMessage {
    fn from(value: ConversationTurn) -> Self {
        Self {
            role: value.role.into(),
            content: value.text,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    #[serde(other)]
    Other,
}
