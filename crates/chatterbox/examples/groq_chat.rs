//! # Interactive Groq chat in the terminal
//!
//! Streams answers from Groq's hosted models through a [`ChatSession`],
//! prints the reasoning pane after each turn and saves finished answers as
//! downloadable markdown files (removed again on exit).
//!
//! ```bash
//! export GROQ_API_KEY=gsk_…                 # mandatory
//! RUST_LOG=chatterbox_core=debug \
//!     cargo run -p chatterbox --example groq_chat -- qwen/qwen3-32b
//! ```
//!
//! Commands: `/clear` resets the conversation, `/quit` exits. Ctrl-C stops
//! the answer currently streaming.
//!
//! ---------------------------------------------------------------------------

use std::io::{self, Write};

use chatterbox::openai::OpenAiAdapterBuilder;
use chatterbox::{
    ChatSession, StreamAssembler,
    config::{ReasoningEffort, RequestConfig},
    model::GPT_OSS_120B,
    transcript::TranscriptStore,
};
use futures_util::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Groq back-end (needs `GROQ_API_KEY` in the env).
    let backend = OpenAiAdapterBuilder::groq_from_env().build()?;

    // 2. Per-request settings; the model decides which extra fields are sent.
    let model = std::env::args()
        .nth(1)
        .unwrap_or_else(|| GPT_OSS_120B.to_owned());
    let config = RequestConfig::builder(model)
        .with_reasoning_effort(ReasoningEffort::Medium)
        .build()?;

    let mut session = ChatSession::new(StreamAssembler::new(backend));
    let transcripts = TranscriptStore::in_temp_dir();

    loop {
        print!("\nyou> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        match line.trim() {
            "/quit" => break,
            "/clear" => {
                session.clear();
                println!("(conversation cleared)");
                continue;
            }
            _ => {}
        }

        // 3. Blank input starts nothing.
        let Some(mut stream) = session.submit(line, &config) else {
            continue;
        };

        // 4. Snapshots replace the displayed answer; print only the new tail.
        print!("assistant> ");
        let mut shown = 0;
        loop {
            tokio::select! {
                snapshot = stream.next() => {
                    let Some(snapshot) = snapshot else { break };

                    print!("{}", &snapshot.answer_text[shown..]);
                    io::stdout().flush().ok();
                    shown = snapshot.answer_text.len();

                    session.apply(&snapshot);
                    if let Some(message) = &snapshot.error_message {
                        eprintln!("\n❌ Error: {message}");
                    }
                    match transcripts.save(&snapshot).await {
                        Ok(Some(path)) => println!("\n(download: {})", path.display()),
                        Ok(None) => {}
                        Err(err) => eprintln!("\n⚠️ Couldn't save transcript: {err}"),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    session.stop();
                    println!("\n(stopped)");
                    break;
                }
            }
        }

        if !session.reasoning().is_empty() {
            println!("\n🧠 {}", session.reasoning());
        }
    }

    // 5. Explicit cleanup of the download files.
    let removed = transcripts.shutdown().await;
    println!("removed {removed} transcript file(s)");
    Ok(())
}
