//! Seam between the assembler and a concrete backend.
//!
//! A backend only has to turn a [`ChatRequest`] into an ordered stream of
//! [`crate::generic::StreamEvent`]s; see [`EventSource`].
mod event_source;
mod request;

pub use event_source::*;
pub use request::*;
