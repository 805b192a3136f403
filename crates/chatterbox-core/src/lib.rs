//! Provider-agnostic core of **chatterbox**.
//!
//! | Module        | What it provides                                                      |
//! |---------------|-----------------------------------------------------------------------|
//! | [`generic`]   | conversation turns, stream events, snapshots                          |
//! | [`config`]    | validated per-request settings                                        |
//! | [`model`]     | model identifiers and the per-model extra request fields              |
//! | [`provider`]  | [`provider::EventSource`], the trait backends implement               |
//! | [`assembler`] | [`assembler::StreamAssembler`], events in, throttled snapshots out    |
//! | [`session`]   | transcript bookkeeping and single-active-stream handling              |
//! | [`transcript`]| download files for finished answers, with explicit cleanup            |
pub mod assembler;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod error;
pub mod generic;
pub mod model;
pub mod provider;
pub mod session;
pub mod transcript;

pub use assembler::StreamAssembler;
pub use session::ChatSession;
