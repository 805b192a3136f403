use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    chat_completion::FinishReason,
    common::{ApiErrorBody, Usage},
};

/// Delta fields that may carry reasoning text, in lookup order.
///
/// Providers disagree on the name: Groq and vLLM send `reasoning`, others
/// (DeepSeek, several OpenAI-compatible proxies) send `reasoning_content`.
pub const DEFAULT_REASONING_FIELDS: &[&str] = &["reasoning", "reasoning_content"];

/// A delta message as returned when `stream = true`.
///
/// Everything except `content` is kept loosely typed so a provider adding or
/// renaming fields never breaks deserialisation of the whole chunk.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionMessageDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionMessageDelta {
    /// First non-empty string among `candidates`.
    pub fn reasoning_from<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&str> {
        candidates
            .iter()
            .filter_map(|field| self.extra.get(field.as_ref()))
            .filter_map(Value::as_str)
            .find(|text| !text.is_empty())
    }
}

/// A single streaming choice payload.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkChoice {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub delta: ChatCompletionMessageDelta,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// The outermost object sent for each SSE chunk.
///
/// `error` is set when the provider aborts generation in-band instead of
/// failing the HTTP request.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatCompletionChunkChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(json: &str) -> ChatCompletionMessageDelta {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reasoning_prefers_first_candidate() {
        let d = delta(r#"{"reasoning": "a", "reasoning_content": "b"}"#);
        assert_eq!(d.reasoning_from(DEFAULT_REASONING_FIELDS), Some("a"));
    }

    #[test]
    fn reasoning_falls_back_to_later_candidates() {
        let d = delta(r#"{"content": null, "reasoning": "", "reasoning_content": "b"}"#);
        assert_eq!(d.reasoning_from(DEFAULT_REASONING_FIELDS), Some("b"));

        let d = delta(r#"{"reasoning": null, "reasoning_content": "c"}"#);
        assert_eq!(d.reasoning_from(DEFAULT_REASONING_FIELDS), Some("c"));
    }

    #[test]
    fn non_string_reasoning_is_ignored() {
        let d = delta(r#"{"reasoning": {"steps": []}}"#);
        assert_eq!(d.reasoning_from(DEFAULT_REASONING_FIELDS), None);
    }

    #[test]
    fn sparse_chunk_deserialises() {
        let chunk: ChatCompletionChunkResponse =
            serde_json::from_str(r#"{"choices": [{"delta": {"content": "hi"}}]}"#).unwrap();

        assert_eq!(chunk.choices[0].index, 0);
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hi"));
        assert!(chunk.error.is_none());
    }
}
