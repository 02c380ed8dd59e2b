//! Bounded intake queue with close-on-shutdown.

use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::error::TaskError;
use crate::task::Task;

/// FIFO hand-off of tasks from submitters to workers, fixed capacity.
///
/// Built on a bounded mpsc channel: `submit` awaits a free slot when the
/// buffer is full (backpressure) and `take` delivers each task to exactly
/// one worker, in submission order. `close` flips an atomic flag so later
/// submits fail fast instead of blocking, and drops the intake sender so
/// `take` observes end-of-input once the buffer empties.
pub struct IntakeQueue {
    tx: StdMutex<Option<mpsc::Sender<Task>>>,
    rx: Mutex<mpsc::Receiver<Task>>,
    closed: AtomicBool,
}

impl IntakeQueue {
    /// Capacity is fixed at construction and must be > 0 (validated by the
    /// service config before anything is built).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: StdMutex::new(Some(tx)),
            rx: Mutex::new(rx),
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueue a task, waiting for a free slot when the buffer is full.
    ///
    /// Fails with `QueueClosed` once shutdown has begun; the flag is checked
    /// before blocking, so post-shutdown submits never hang. A submit that
    /// is already waiting on a slot when `close` runs holds its own sender
    /// clone and still lands in the buffer: no task is silently dropped.
    pub async fn submit(&self, task: Task) -> Result<(), TaskError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TaskError::QueueClosed);
        }
        let tx = {
            let slot = self.tx.lock().unwrap_or_else(|e| e.into_inner());
            slot.clone()
        };
        let Some(tx) = tx else {
            return Err(TaskError::QueueClosed);
        };
        tx.send(task).await.map_err(|_| TaskError::QueueClosed)
    }

    /// Dequeue the next task, waiting until one is available. Returns `None`
    /// once the queue is closed and every buffered task has been handed out,
    /// which is the worker loop's signal to terminate.
    pub async fn take(&self) -> Option<Task> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Stop accepting new tasks. Idempotent. Already-buffered tasks remain
    /// available to `take` until drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let mut slot = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            payload: String::new(),
            max_retries: 1,
        }
    }

    #[tokio::test]
    async fn delivers_in_submission_order() {
        let queue = IntakeQueue::new(4);
        queue.submit(task("t1")).await.unwrap();
        queue.submit(task("t2")).await.unwrap();
        queue.submit(task("t3")).await.unwrap();

        assert_eq!(queue.take().await.unwrap().id, "t1");
        assert_eq!(queue.take().await.unwrap().id, "t2");
        assert_eq!(queue.take().await.unwrap().id, "t3");
    }

    #[tokio::test]
    async fn submit_after_close_fails_immediately() {
        let queue = IntakeQueue::new(4);
        queue.close();

        let result = timeout(Duration::from_millis(100), queue.submit(task("t1"))).await;
        assert_eq!(result.unwrap(), Err(TaskError::QueueClosed));
    }

    #[tokio::test]
    async fn take_returns_none_when_closed_and_drained() {
        let queue = IntakeQueue::new(4);
        queue.submit(task("t1")).await.unwrap();
        queue.close();

        assert_eq!(queue.take().await.unwrap().id, "t1");
        assert!(queue.take().await.is_none());
    }

    #[tokio::test]
    async fn full_buffer_blocks_submit_until_a_slot_frees() {
        let queue = IntakeQueue::new(2);
        queue.submit(task("t1")).await.unwrap();
        queue.submit(task("t2")).await.unwrap();

        // Third submit must block: no free slot and nobody dequeuing.
        let blocked = timeout(Duration::from_millis(50), queue.submit(task("t3"))).await;
        assert!(blocked.is_err());

        // A dequeue frees a slot, after which the submit goes through.
        assert_eq!(queue.take().await.unwrap().id, "t1");
        timeout(Duration::from_millis(500), queue.submit(task("t3")))
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let queue = IntakeQueue::new(1);
        queue.close();
        queue.close();
        assert!(queue.is_closed());
    }
}
