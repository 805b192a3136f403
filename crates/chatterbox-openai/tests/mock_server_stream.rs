use chatterbox_core::{
    assembler::StreamAssembler,
    cancel::CancelHandle,
    config::RequestConfig,
    generic::{ConversationTurn, Snapshot},
};
use chatterbox_openai::OpenAiAdapterBuilder;
use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "llama-3.3-70b-versatile";

fn sse(frames: &[serde_json::Value], done: bool) -> String {
    let mut body: String = frames
        .iter()
        .map(|frame| format!("data: {frame}\n\n"))
        .collect();
    if done {
        body.push_str("data: [DONE]\n\n");
    }
    body
}

async fn mount_sse(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer EMPTY"))
        .and(body_partial_json(json!({ "model": MODEL, "stream": true })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

async fn snapshots(server: &MockServer) -> Vec<Snapshot> {
    let adapter = OpenAiAdapterBuilder::local(server.uri()).build().unwrap();
    let config = RequestConfig::builder(MODEL).build().unwrap();
    let history = [ConversationTurn::user("Hi"), ConversationTurn::placeholder()];

    StreamAssembler::new(adapter)
        .run(&history, &config, CancelHandle::new())
        .collect()
        .await
}

fn only_final(snapshots: &[Snapshot]) -> &Snapshot {
    let finals: Vec<_> = snapshots.iter().filter(|s| s.is_final).collect();
    assert_eq!(finals.len(), 1, "exactly one final snapshot");
    assert!(snapshots.last().unwrap().is_final, "final snapshot comes last");
    finals[0]
}

#[tokio::test]
async fn finish_reason_completes_the_answer() {
    let server = MockServer::start().await;
    let body = sse(
        &[
            json!({"choices": [{"delta": {"role": "assistant", "reasoning": "greet "}}]}),
            json!({"choices": [{"index": 0, "delta": {"content": "Hel"}}]}),
            json!({"choices": []}),
            json!({"choices": [{"index": 0, "delta": {"content": "lo"}, "finish_reason": "stop"}]}),
            json!({"choices": [{"index": 0, "delta": {"content": " ignored"}}]}),
        ],
        true,
    );
    mount_sse(&server, body).await;

    let snapshots = snapshots(&server).await;

    let last = only_final(&snapshots);
    assert!(last.is_success());
    assert_eq!(last.answer_text, "Hello");
    assert_eq!(last.reasoning_text, "greet ");
}

#[tokio::test]
async fn done_frame_completes_the_answer() {
    let server = MockServer::start().await;
    let mut body = sse(
        &[
            json!({"choices": [{"index": 0, "delta": {"reasoning_content": "think"}}]}),
            json!({"choices": [{"index": 0, "delta": {"content": "Answer"}}]}),
        ],
        true,
    );
    body.push_str(&sse(
        &[json!({"choices": [{"index": 0, "delta": {"content": " after done"}}]})],
        false,
    ));
    mount_sse(&server, body).await;

    let snapshots = snapshots(&server).await;

    let last = only_final(&snapshots);
    assert!(last.is_success());
    assert_eq!(last.answer_text, "Answer");
    assert_eq!(last.reasoning_text, "think");
}

#[tokio::test]
async fn in_band_error_keeps_partial_answer() {
    let server = MockServer::start().await;
    let body = sse(
        &[
            json!({"choices": [{"index": 0, "delta": {"content": "Part"}}]}),
            json!({"error": {"message": "model overloaded", "type": "server_error"}}),
        ],
        false,
    );
    mount_sse(&server, body).await;

    let snapshots = snapshots(&server).await;

    let last = only_final(&snapshots);
    assert_eq!(last.answer_text, "Part");
    assert_eq!(last.error_message.as_deref(), Some("model overloaded"));
}

#[tokio::test]
async fn unauthorized_status_becomes_error_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API Key", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let snapshots = snapshots(&server).await;

    assert_eq!(snapshots.len(), 1);
    let last = &snapshots[0];
    assert!(last.is_final);
    assert!(!last.is_success());
    assert_eq!(last.answer_text, "");
    let message = last.error_message.as_deref().unwrap();
    assert!(message.contains("401"), "{message}");
    assert!(message.contains("Invalid API Key"), "{message}");
}
