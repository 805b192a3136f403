use chatterbox_core::error::ChatterboxError;
use chatterbox_core::generic::StreamEvent;
use chatterbox_core::provider::{ChatRequest, EventSource, EventStream};

use crate::OpenAiAdapter;
use crate::api_v1::{ChatCompletionChunkResponse, ChatCompletionRequest};

impl EventSource for OpenAiAdapter {
    fn stream_events<'s>(&'s self, request: ChatRequest) -> EventStream<'s> {
        let client = self.client.clone();
        let reasoning_fields = self.reasoning_fields.as_slice();

        Box::pin(async_stream::try_stream! {
            use futures_util::StreamExt;

            let request = ChatCompletionRequest::from(request);

            let stream = client.chat_completion_stream(request);
            futures_util::pin_mut!(stream);

            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(ChatterboxError::from)?;

                for event in chunk_events(chunk, reasoning_fields) {
                    let terminal = !matches!(event, StreamEvent::Delta { .. });
                    yield event;
                    if terminal {
                        return;
                    }
                }
            }
        })
    }
}

/// Translate one SSE chunk into assembler events.
///
/// Only choice `0` is considered. A chunk without it becomes a heartbeat.
/// A set `finish_reason` closes the stream right after the choice's delta.
fn chunk_events<S: AsRef<str>>(
    chunk: ChatCompletionChunkResponse,
    reasoning_fields: &[S],
) -> Vec<StreamEvent> {
    if let Some(error) = chunk.error {
        return vec![StreamEvent::Error {
            message: error.message,
        }];
    }

    let Some(choice) = chunk.choices.into_iter().find(|choice| choice.index == 0) else {
        return vec![StreamEvent::heartbeat()];
    };

    let reasoning = choice
        .delta
        .reasoning_from(reasoning_fields)
        .map(str::to_owned);
    let answer = choice.delta.content.filter(|text| !text.is_empty());

    let mut events = vec![StreamEvent::Delta { answer, reasoning }];
    if choice.finish_reason.is_some() {
        events.push(StreamEvent::End);
    }
    events
}

#[cfg(test)]
mod tests {
    use crate::api_v1::DEFAULT_REASONING_FIELDS;

    use super::*;

    fn events(json: &str) -> Vec<StreamEvent> {
        let chunk: ChatCompletionChunkResponse = serde_json::from_str(json).unwrap();
        chunk_events(chunk, DEFAULT_REASONING_FIELDS)
    }

    #[test]
    fn content_and_reasoning_are_split() {
        assert_eq!(
            events(r#"{"choices": [{"delta": {"content": "Hi", "reasoning": "greet"}}]}"#),
            vec![StreamEvent::Delta {
                answer: Some("Hi".into()),
                reasoning: Some("greet".into()),
            }]
        );
    }

    #[test]
    fn reasoning_content_is_used_as_fallback() {
        assert_eq!(
            events(r#"{"choices": [{"delta": {"reasoning_content": "hmm"}}]}"#),
            vec![StreamEvent::reasoning("hmm")]
        );
    }

    #[test]
    fn empty_choices_become_heartbeat() {
        assert_eq!(events(r#"{"choices": []}"#), vec![StreamEvent::heartbeat()]);
        assert_eq!(events(r#"{}"#), vec![StreamEvent::heartbeat()]);
    }

    #[test]
    fn finish_reason_ends_the_stream() {
        assert_eq!(
            events(r#"{"choices": [{"delta": {"content": "."}, "finish_reason": "stop"}]}"#),
            vec![StreamEvent::answer("."), StreamEvent::End]
        );
    }

    #[test]
    fn in_band_error_is_terminal() {
        assert_eq!(
            events(r#"{"error": {"message": "model overloaded"}}"#),
            vec![StreamEvent::error("model overloaded")]
        );
    }

    #[test]
    fn other_choices_are_ignored() {
        assert_eq!(
            events(r#"{"choices": [{"index": 1, "delta": {"content": "alt"}}]}"#),
            vec![StreamEvent::heartbeat()]
        );
    }
}
