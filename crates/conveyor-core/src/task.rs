//! Task domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unit of submitted work. Immutable once accepted.
///
/// The id is caller-supplied and is the sole key into the state store; the
/// payload is opaque to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub payload: String,
    pub max_retries: u32,
}

/// Lifecycle state of a task. Exactly one current state per id; each write
/// overwrites the previous one (no history).
///
/// Transitions:
/// - Queued -> Running -> Done
/// - Queued -> Running -> Failed
///
/// Done and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Accepted and buffered, waiting for a worker.
    Queued,

    /// Currently being executed by a worker.
    Running,

    /// Completed successfully.
    Done,

    /// Failed permanently (attempts exhausted).
    Failed,
}

impl TaskState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Done | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Queued => "queued",
            TaskState::Running => "running",
            TaskState::Done => "done",
            TaskState::Failed => "failed",
        };
        f.write_str(s)
    }
}
