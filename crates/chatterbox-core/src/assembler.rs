//! Incremental assembly of a streamed completion into renderable snapshots.
//!
//! [`StreamAssembler::run`] opens one completion on an [`EventSource`],
//! appends every answer and reasoning fragment to its accumulators, and hands
//! out [`Snapshot`]s at most once per flush interval. The terminal snapshot
//! (normal end or error) is never throttled. Cancelling the [`CancelHandle`]
//! ends the snapshot stream silently at the next event boundary.
//!
//! ```rust,no_run
//! # use chatterbox_core::{assembler::StreamAssembler, cancel::CancelHandle,
//! #     config::RequestConfig, generic::ConversationTurn, provider::EventSource};
//! # async fn demo<S: EventSource + 'static>(source: S) {
//! use futures_util::StreamExt;
//!
//! let assembler = StreamAssembler::new(source);
//! let config = RequestConfig::builder("llama-3.3-70b-versatile").build().unwrap();
//! let history = vec![ConversationTurn::user("Hi"), ConversationTurn::placeholder()];
//!
//! let mut snapshots = assembler.run(&history, &config, CancelHandle::new());
//! while let Some(snapshot) = snapshots.next().await {
//!     println!("{}", snapshot.answer_text);
//! }
//! # }
//! ```
use std::{
    pin::Pin,
    sync::Arc,
    time::{Duration, Instant},
};

use futures_core::stream::Stream;
use futures_util::StreamExt;
use tracing::{debug, trace, warn};

use crate::{
    cancel::CancelHandle,
    clock::{Clock, SystemClock},
    config::RequestConfig,
    generic::{ConversationTurn, Snapshot, StreamEvent},
    model::ModelExtrasTable,
    provider::{ChatRequest, EventSource},
};

/// Minimum spacing between two non-final snapshots (~25 updates per second).
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(40);

pub type SnapshotStream = Pin<Box<dyn Stream<Item = Snapshot> + Send + 'static>>;

/// Turns an [`EventSource`] into throttled snapshot streams.
///
/// Cloning is cheap; clones share the source, clock and model table. Every
/// call to [`Self::run`] owns its own accumulators, so concurrent runs do not
/// interfere with each other.
pub struct StreamAssembler<S> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    flush_interval: Duration,
    extras: Arc<ModelExtrasTable>,
}

impl<S> Clone for StreamAssembler<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            clock: Arc::clone(&self.clock),
            flush_interval: self.flush_interval,
            extras: Arc::clone(&self.extras),
        }
    }
}

impl<S> StreamAssembler<S>
where
    S: EventSource + 'static,
{
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            clock: Arc::new(SystemClock),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            extras: Arc::new(ModelExtrasTable::default()),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn with_model_extras(mut self, extras: ModelExtrasTable) -> Self {
        self.extras = Arc::new(extras);
        self
    }

    /// Access the underlying event source.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    /// Stream one completion for `history`.
    ///
    /// `history` must end with the new user turn, optionally followed by the
    /// empty assistant placeholder. Blank user input is the caller's problem:
    /// check it before calling (see [`crate::session::ChatSession::submit`]).
    ///
    /// Nothing happens until the returned stream is polled.
    pub fn run(
        &self,
        history: &[ConversationTurn],
        config: &RequestConfig,
        cancel: CancelHandle,
    ) -> SnapshotStream {
        let request = ChatRequest::from_history(history, config, &self.extras);
        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);
        let flush_interval = self.flush_interval;

        Box::pin(async_stream::stream! {
            if cancel.is_cancelled() {
                debug!("stream cancelled before the request was opened");
                return;
            }

            debug!(
                model = %request.model,
                messages = request.messages.len(),
                "opening completion stream"
            );

            let mut state = AssemblerState::new(clock.now());
            let events = source.stream_events(request);
            futures_util::pin_mut!(events);

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    item = events.next() => Some(item),
                };

                // An event that raced with cancellation is discarded as well.
                let Some(item) = next.filter(|_| !cancel.is_cancelled()) else {
                    debug!(
                        answer_len = state.answer.len(),
                        "stream cancelled, dropping event source"
                    );
                    return;
                };

                match item {
                    Some(Ok(StreamEvent::Delta { answer, reasoning })) => {
                        if !state.append(answer.as_deref(), reasoning.as_deref()) {
                            continue;
                        }
                        if state.should_flush(clock.now(), flush_interval) {
                            trace!(answer_len = state.answer.len(), "emitting snapshot");
                            yield state.snapshot(false, None);
                        }
                    }
                    // A source that runs dry without `End` finished normally.
                    Some(Ok(StreamEvent::End)) | None => {
                        debug!(
                            answer_len = state.answer.len(),
                            reasoning_len = state.reasoning.len(),
                            "completion stream finished"
                        );
                        yield state.snapshot(true, None);
                        return;
                    }
                    Some(Ok(StreamEvent::Error { message })) => {
                        warn!(%message, "provider reported an error mid-stream");
                        yield state.snapshot(true, Some(message));
                        return;
                    }
                    Some(Err(err)) => {
                        warn!(error = %err, "completion stream failed");
                        yield state.snapshot(true, Some(err.to_string()));
                        return;
                    }
                }
            }
        })
    }
}

/// Accumulators of a single run. Append-only.
#[derive(Debug)]
struct AssemblerState {
    answer: String,
    reasoning: String,
    last_emit: Instant,
}

impl AssemblerState {
    fn new(started_at: Instant) -> Self {
        Self {
            answer: String::new(),
            reasoning: String::new(),
            last_emit: started_at,
        }
    }

    /// Returns `true` if anything was appended.
    fn append(&mut self, answer: Option<&str>, reasoning: Option<&str>) -> bool {
        let mut changed = false;

        if let Some(fragment) = answer.filter(|f| !f.is_empty()) {
            self.answer.push_str(fragment);
            changed = true;
        }
        if let Some(fragment) = reasoning.filter(|f| !f.is_empty()) {
            self.reasoning.push_str(fragment);
            changed = true;
        }

        changed
    }

    fn should_flush(&mut self, now: Instant, interval: Duration) -> bool {
        if now.saturating_duration_since(self.last_emit) >= interval {
            self.last_emit = now;
            true
        } else {
            false
        }
    }

    fn snapshot(&self, is_final: bool, error_message: Option<String>) -> Snapshot {
        Snapshot {
            answer_text: self.answer.clone(),
            reasoning_text: self.reasoning.clone(),
            is_final,
            error_message,
        }
    }
}
