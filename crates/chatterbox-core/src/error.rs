//! Unified error type exposed by **`chatterbox-core`**.
//!
//! Backend crates convert their internal errors into one of these variants
//! before handing them to the [`crate::assembler::StreamAssembler`], which in
//! turn folds them into a terminal error snapshot.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ChatterboxError>;

#[derive(Debug, Error)]
pub enum ChatterboxError {
    /// Generic forwarding of any backend-specific error that doesn’t fit another
    /// category.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Reading or writing a transcript file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A request setting or backend option was rejected before anything was
    /// sent (out-of-range parameter, missing API key).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
