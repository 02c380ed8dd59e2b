//! Task state storage: port + in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::task::TaskState;

/// Failure writing to a state store backend.
///
/// The submit and worker paths treat this as best-effort: the error is
/// logged and processing continues.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("state store write failed: {0}")]
pub struct StoreWriteError(pub String);

/// Latest-state-wins key/value store port.
///
/// Shared by the submitter (writer for `Queued`) and the worker pool
/// (writer for `Running`/`Done`/`Failed`); nothing else mutates it.
/// The in-memory implementation never fails a write; the Result is the
/// seam for backends that can.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current state for a task, or `None` if the id was never written.
    async fn get(&self, task_id: &str) -> Option<TaskState>;

    /// Unconditional overwrite of the current state.
    async fn set(&self, task_id: &str, state: TaskState) -> Result<(), StoreWriteError>;
}

/// In-memory store guarded by a reader/writer lock: readers proceed
/// concurrently, a writer excludes everyone for the single map mutation.
///
/// The lock is never held across an await. Entries live for the process
/// lifetime; the core never deletes them.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    tasks: RwLock<HashMap<String, TaskState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, task_id: &str) -> Option<TaskState> {
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
        tasks.get(task_id).copied()
    }

    async fn set(&self, task_id: &str, state: TaskState) -> Result<(), StoreWriteError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        tasks.insert(task_id.to_string(), state);
        Ok(())
    }
}
