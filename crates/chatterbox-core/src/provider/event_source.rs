use std::pin::Pin;

use futures_core::stream::Stream;

use crate::{error::Result, generic::StreamEvent, provider::ChatRequest};

/// Boxed event stream returned by every [`EventSource`].
pub type EventStream<'s> = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send + 's>>;

/// A **backend** turns a [`ChatRequest`] into a streaming network call to a
/// concrete provider (OpenAI, Groq, a local server, …) and translates the
/// wire chunks into [`StreamEvent`]s.
///
/// Contract for implementors:
///
/// * Events arrive in the order the provider produced them.
/// * The stream ends after yielding exactly one of `End` or `Error`. A stream
///   that simply runs dry is treated as `End` by the assembler.
/// * Transport failures (connect errors, non-success status, broken frames)
///   are yielded as `Err` items. The assembler turns them into a terminal
///   error snapshot, so implementors should not try to recover themselves.
/// * Dropping the stream must release the underlying connection; that is how
///   cancellation stops generation upstream.
pub trait EventSource: Send + Sync {
    /// Open one streaming completion.
    fn stream_events<'s>(&'s self, request: ChatRequest) -> EventStream<'s>;
}
