//! Cooperative cancellation for snapshot streams.

use tokio_util::sync::CancellationToken;

/// A handle that can be used to stop a running stream.
///
/// Clones observe the same state. Once cancelled, a handle stays cancelled;
/// start every request with a fresh one.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The assembler stops at the next event boundary
    /// and drops the event source, closing the underlying connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
