//! Fixed pool of workers draining the intake queue.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::executor::TaskExecutor;
use crate::queue::IntakeQueue;
use crate::store::StateStore;
use crate::task::TaskState;

/// Handle over `n` concurrently running worker loops.
///
/// Each worker pulls from the shared queue, so every task is processed by
/// exactly one of them. Workers exit when the queue reports
/// closed-and-drained; `join` therefore doubles as the drain barrier: it
/// returns only after every accepted task has reached a terminal state.
pub struct WorkerPool {
    joins: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `n` workers.
    pub fn spawn(
        n: usize,
        queue: Arc<IntakeQueue>,
        store: Arc<dyn StateStore>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let queue = Arc::clone(&queue);
            let store = Arc::clone(&store);
            let executor = Arc::clone(&executor);
            joins.push(tokio::spawn(async move {
                worker_loop(worker_id, queue, store, executor).await;
            }));
        }
        Self { joins }
    }

    /// Wait for every worker to finish. Only meaningful after the queue has
    /// been closed; blocks until all buffered and in-flight tasks are
    /// terminal.
    pub async fn join(self) {
        for join in self.joins {
            let _ = join.await;
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<IntakeQueue>,
    store: Arc<dyn StateStore>,
    executor: Arc<dyn TaskExecutor>,
) {
    while let Some(task) = queue.take().await {
        // Once dequeued, the task runs to completion; shutdown only stops
        // the intake side. State writes are best-effort: the store is
        // advisory to observers, not authoritative for control flow.
        if let Err(e) = store.set(&task.id, TaskState::Running).await {
            warn!(worker_id, task_id = %task.id, error = %e, "failed to set task state");
        }

        let done = executor.execute(&task).await;

        let state = if done { TaskState::Done } else { TaskState::Failed };
        debug!(worker_id, task_id = %task.id, %state, "task finished");
        if let Err(e) = store.set(&task.id, state).await {
            warn!(worker_id, task_id = %task.id, error = %e, "failed to set task state");
        }
    }
    debug!(worker_id, "worker stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::timeout;

    use super::*;
    use crate::store::InMemoryStateStore;
    use crate::task::Task;

    struct FixedOutcome(bool);

    #[async_trait]
    impl TaskExecutor for FixedOutcome {
        async fn execute(&self, _task: &Task) -> bool {
            self.0
        }
    }

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            payload: String::new(),
            max_retries: 1,
        }
    }

    #[tokio::test]
    async fn workers_drain_queue_and_record_terminal_states() {
        let queue = Arc::new(IntakeQueue::new(4));
        let store = Arc::new(InMemoryStateStore::new());
        let pool = WorkerPool::spawn(
            2,
            Arc::clone(&queue),
            store.clone() as Arc<dyn StateStore>,
            Arc::new(FixedOutcome(true)),
        );

        for id in ["t1", "t2", "t3", "t4"] {
            queue.submit(task(id)).await.unwrap();
        }
        queue.close();
        timeout(Duration::from_secs(1), pool.join()).await.unwrap();

        for id in ["t1", "t2", "t3", "t4"] {
            assert_eq!(store.get(id).await, Some(TaskState::Done));
        }
    }

    #[tokio::test]
    async fn failed_execution_records_failed() {
        let queue = Arc::new(IntakeQueue::new(1));
        let store = Arc::new(InMemoryStateStore::new());
        let pool = WorkerPool::spawn(
            1,
            Arc::clone(&queue),
            store.clone() as Arc<dyn StateStore>,
            Arc::new(FixedOutcome(false)),
        );

        queue.submit(task("t1")).await.unwrap();
        queue.close();
        timeout(Duration::from_secs(1), pool.join()).await.unwrap();

        assert_eq!(store.get("t1").await, Some(TaskState::Failed));
    }
}
