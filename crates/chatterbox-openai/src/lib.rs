//! OpenAI-compatible streaming backend for **chatterbox**.
//!
//! One adapter covers OpenAI itself, Groq and self-hosted servers speaking
//! the `/v1/chat/completions` SSE protocol; see [`OpenAiAdapterBuilder`].
mod adapter;
mod provider_impl_events;
mod sse;

pub use adapter::{
    GROQ_BASE_URL, LOCAL_BASE_URL, OpenAiAdapter, OpenAiAdapterBuilder, PLACEHOLDER_API_KEY,
};
pub mod api_v1;
pub mod client;
pub mod error;
