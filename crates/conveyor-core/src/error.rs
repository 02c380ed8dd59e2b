//! Error taxonomy for the public operations.

use thiserror::Error;

/// Errors surfaced by the two public operations of [`crate::TaskService`].
///
/// State store write failures are deliberately absent: they are logged and
/// swallowed on the submit and worker paths, because the store is an
/// observability artifact, not the source of truth for whether a task ran.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Bad input, returned synchronously before any mutation.
    #[error("validation: {0}")]
    Validation(String),

    /// State query for an id that was never submitted.
    #[error("task not found")]
    NotFound,

    /// Submission attempted after shutdown began. Fails immediately, never
    /// blocks.
    #[error("queue is closed due to shutdown")]
    QueueClosed,

    /// The caller's context ended before the operation completed. Caller
    /// cancellation here is normally future-drop; the variant exists so
    /// adapters and alternative backends can surface it as a value.
    #[error("operation cancelled")]
    Cancelled,
}
