//! Submission/query surface and shutdown coordination.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::CoreConfig;
use crate::error::TaskError;
use crate::executor::TaskExecutor;
use crate::pool::WorkerPool;
use crate::queue::IntakeQueue;
use crate::store::StateStore;
use crate::task::{Task, TaskState};

/// Public surface of the task-execution subsystem.
///
/// Owns the intake queue and the worker pool, shares the state store with
/// the workers. Two operations (`enqueue_task`, `task_state`) plus the
/// drain-on-shutdown barrier.
pub struct TaskService {
    store: Arc<dyn StateStore>,
    queue: Arc<IntakeQueue>,
    pool: Mutex<Option<WorkerPool>>,
}

impl TaskService {
    /// Validates the config, then spawns the workers. Misconfiguration
    /// (zero workers or zero capacity) fails here, before any task flows.
    pub fn new(
        config: CoreConfig,
        store: Arc<dyn StateStore>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Result<Self, TaskError> {
        config.validate()?;

        let queue = Arc::new(IntakeQueue::new(config.queue_capacity));
        let pool = WorkerPool::spawn(
            config.workers,
            Arc::clone(&queue),
            Arc::clone(&store),
            executor,
        );
        info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "task service started"
        );

        Ok(Self {
            store,
            queue,
            pool: Mutex::new(Some(pool)),
        })
    }

    /// Validate and accept a task: record `Queued`, then hand it to the
    /// queue, awaiting a free slot when the buffer is full.
    ///
    /// A `Validation` error touches neither the store nor the queue.
    /// `QueueClosed` from the queue is propagated unchanged.
    pub async fn enqueue_task(&self, task: Task) -> Result<(), TaskError> {
        validate_task(&task)?;

        // Checked before the Queued write so a post-shutdown submit leaves
        // no stray entry behind.
        if self.queue.is_closed() {
            return Err(TaskError::QueueClosed);
        }

        if let Err(e) = self.store.set(&task.id, TaskState::Queued).await {
            warn!(task_id = %task.id, error = %e, "failed to set task state");
        }

        self.queue.submit(task).await
    }

    /// Current lifecycle state of a task.
    pub async fn task_state(&self, task_id: &str) -> Result<TaskState, TaskError> {
        self.store.get(task_id).await.ok_or(TaskError::NotFound)
    }

    /// Stop intake and block until every previously accepted task, buffered
    /// or in-flight, has reached a terminal state.
    ///
    /// Idempotent: a concurrent second call waits for the drain to finish,
    /// any later call is a no-op.
    pub async fn shutdown(&self) {
        let mut slot = self.pool.lock().await;
        let Some(pool) = slot.take() else {
            return;
        };

        self.queue.close();
        info!("intake closed, draining outstanding tasks");
        pool.join().await;
        info!("task service drained");
    }
}

fn validate_task(task: &Task) -> Result<(), TaskError> {
    if task.id.is_empty() {
        return Err(TaskError::Validation("task id is required".to_string()));
    }
    if task.max_retries == 0 {
        return Err(TaskError::Validation(
            "max retries must be > 0".to_string(),
        ));
    }
    Ok(())
}
