//! Conversation state for an interactive chat front-end.
//!
//! [`Conversation`] keeps the transcript and owns the placeholder rule: at
//! most one in-flight assistant turn, always last. [`ChatSession`] wires a
//! conversation to a [`StreamAssembler`] and makes sure only one stream is
//! live at a time: submitting again, stopping or clearing cancels the
//! previous one.
use tracing::debug;

use crate::{
    assembler::{SnapshotStream, StreamAssembler},
    cancel::CancelHandle,
    config::RequestConfig,
    generic::{ConversationTurn, Snapshot},
    provider::EventSource,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    /// Index of the assistant turn currently being streamed into.
    pending: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Append the user's turn followed by an empty assistant placeholder.
    ///
    /// A response still pending from an earlier turn is finished first.
    pub fn push_user_with_placeholder(&mut self, text: impl Into<String>) {
        self.finish();
        self.turns.push(ConversationTurn::user(text));
        self.turns.push(ConversationTurn::placeholder());
        self.pending = Some(self.turns.len() - 1);
    }

    /// Show `snapshot` in the pending assistant turn.
    ///
    /// Ignored when nothing is pending.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        let Some(index) = self.pending else {
            return;
        };
        if let Some(turn) = self.turns.get_mut(index) {
            turn.text.clone_from(&snapshot.answer_text);
        }
        if snapshot.is_final {
            self.finish();
        }
    }

    /// Close the pending response. A placeholder that never received text is
    /// removed so it cannot end up in the middle of the transcript.
    pub fn finish(&mut self) {
        if let Some(index) = self.pending.take()
            && self.turns.get(index).is_some_and(ConversationTurn::is_placeholder)
        {
            self.turns.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.pending = None;
    }
}

/// One chat window: transcript, reasoning pane, error line and the active
/// stream.
pub struct ChatSession<S> {
    assembler: StreamAssembler<S>,
    conversation: Conversation,
    reasoning: String,
    last_error: Option<String>,
    active: Option<CancelHandle>,
}

impl<S> ChatSession<S>
where
    S: EventSource + 'static,
{
    pub fn new(assembler: StreamAssembler<S>) -> Self {
        Self {
            assembler,
            conversation: Conversation::new(),
            reasoning: String::new(),
            last_error: None,
            active: None,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Reasoning text of the latest response.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// Start streaming a reply to `text`.
    ///
    /// Returns `None` without touching any state when `text` is blank.
    /// Otherwise any stream still running is cancelled, the user turn and a
    /// placeholder are appended, and the new snapshot stream is returned.
    /// Feed every snapshot back through [`Self::apply`].
    pub fn submit(&mut self, text: &str, config: &RequestConfig) -> Option<SnapshotStream> {
        if text.trim().is_empty() {
            return None;
        }

        self.stop();
        self.reasoning.clear();
        self.last_error = None;
        self.conversation.push_user_with_placeholder(text);

        let cancel = CancelHandle::new();
        self.active = Some(cancel.clone());

        Some(self.assembler.run(self.conversation.turns(), config, cancel))
    }

    pub fn apply(&mut self, snapshot: &Snapshot) {
        self.conversation.apply_snapshot(snapshot);
        self.reasoning.clone_from(&snapshot.reasoning_text);
        if let Some(message) = &snapshot.error_message {
            self.last_error = Some(message.clone());
        }
        if snapshot.is_final {
            self.active = None;
        }
    }

    /// Cancel the running stream, keeping whatever was already shown.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.active.take() {
            debug!("cancelling in-flight stream");
            cancel.cancel();
        }
        self.conversation.finish();
    }

    /// Cancel the running stream and forget the whole conversation.
    pub fn clear(&mut self) {
        self.stop();
        self.conversation.clear();
        self.reasoning.clear();
        self.last_error = None;
    }
}
