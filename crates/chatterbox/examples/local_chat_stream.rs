//! # One-shot streaming against a local OpenAI-compatible server
//!
//! Points the adapter at a self-hosted endpoint (vLLM, llama.cpp server, …)
//! serving `openai/gpt-oss-120b` and drives a [`StreamAssembler`] directly,
//! without a session.
//!
//! ```bash
//! cargo run -p chatterbox --example local_chat_stream -- http://192.168.0.10:8000/v1
//! ```
//!
//! ---------------------------------------------------------------------------

use chatterbox::openai::{LOCAL_BASE_URL, OpenAiAdapterBuilder};
use chatterbox::{
    StreamAssembler,
    cancel::CancelHandle,
    config::{ReasoningEffort, RequestConfig},
    generic::ConversationTurn,
    model::GPT_OSS_120B,
};
use futures_util::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| LOCAL_BASE_URL.to_owned());
    let backend = OpenAiAdapterBuilder::local(base_url).build()?;
    let assembler = StreamAssembler::new(backend);

    let config = RequestConfig::builder(GPT_OSS_120B)
        .with_reasoning_effort(ReasoningEffort::Low)
        .with_max_tokens(1024)
        .build()?;
    let history = vec![
        ConversationTurn::user("Explain Rust's borrow checker in three sentences."),
        ConversationTurn::placeholder(),
    ];

    let mut snapshots = assembler.run(&history, &config, CancelHandle::new());
    let mut updates = 0;
    while let Some(snapshot) = snapshots.next().await {
        updates += 1;
        if snapshot.is_final {
            println!("🧠 {}\n", snapshot.reasoning_text);
            println!("{}", snapshot.answer_text);
            if let Some(message) = snapshot.error_message {
                eprintln!("❌ Error: {message}");
            }
        }
    }

    println!("\n({updates} snapshot(s) rendered)");
    Ok(())
}
