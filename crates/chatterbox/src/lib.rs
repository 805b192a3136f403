//! # `chatterbox` – The umbrella crate
//!
//! Streams chat completions into a transcript: answer text and an optional
//! reasoning side-channel are accumulated from the provider's token stream
//! and handed out as throttled, full-replacement snapshots.
//!
//! | Crate                   | What it provides                                                            |
//! |-------------------------|-----------------------------------------------------------------------------|
//! | **`chatterbox-core`**   | `StreamAssembler`, `ChatSession`, request config, model table, transcripts |
//! | **`chatterbox-openai`** | HTTP/SSE backend for OpenAI, Groq and local servers *(optional)*           |
//!
//! The `openai` Cargo feature (on by default) re-exports the backend crate as
//! [`openai`] so one dependency line is enough:
//!
//! ```toml
//! [dependencies]
//! chatterbox = { version = "0.1", features = ["openai"] }
//! ```
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use chatterbox::{
//!     ChatSession, StreamAssembler,
//!     config::RequestConfig,
//!     model::QWEN3_32B,
//! };
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = chatterbox::openai::OpenAiAdapterBuilder::groq_from_env().build()?;
//!     let mut session = ChatSession::new(StreamAssembler::new(backend));
//!     let config = RequestConfig::builder(QWEN3_32B).build()?;
//!
//!     if let Some(mut stream) = session.submit("Hi!", &config) {
//!         while let Some(snapshot) = stream.next().await {
//!             session.apply(&snapshot);
//!         }
//!     }
//!     println!("{:?}", session.conversation().turns());
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/chatterbox/latest")]

pub use chatterbox_core::*;

#[cfg(feature = "openai")]
pub use chatterbox_openai as openai;
