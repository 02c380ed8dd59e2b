//! Task execution: port + simulated retry executor.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

use crate::task::Task;

/// Executes one task to completion. `true` means success.
///
/// This is the seam where real task logic replaces the simulation. The
/// contract an implementation must honor: at most `task.max_retries`
/// attempts, non-decreasing backoff between failed attempts, and it always
/// returns within `max_retries` bounded pauses. State recording is the
/// caller's responsibility; implementations have no side effects on shared
/// state.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, task: &Task) -> bool;
}

/// Stand-in executor: pauses for a random work duration per attempt and
/// fails with a fixed probability, retrying with exponential backoff plus
/// jitter until success or `task.max_retries` attempts are exhausted.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    /// Lower bound of the simulated unit-of-work latency.
    pub work_min: Duration,

    /// Upper bound (inclusive) of the simulated unit-of-work latency.
    pub work_max: Duration,

    /// Probability in `[0, 1]` that a single attempt fails.
    pub failure_probability: f64,

    /// Base delay for backoff; also bounds the jitter.
    pub base_delay: Duration,
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self {
            work_min: Duration::from_millis(100),
            work_max: Duration::from_millis(500),
            failure_probability: 0.2,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl SimulatedExecutor {
    /// Backoff before the attempt after `attempt` failures, jitter excluded:
    /// `base_delay * 2^attempt`. Pure so the non-decreasing contract can be
    /// tested without sleeping.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    fn random_work(&self) -> Duration {
        let min = self.work_min.as_millis() as u64;
        let max = self.work_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    fn random_jitter(&self) -> Duration {
        let bound = self.base_delay.as_millis() as u64;
        if bound == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..bound))
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(&self, task: &Task) -> bool {
        for attempt in 1..=task.max_retries {
            sleep(self.random_work()).await;

            if !rand::thread_rng().gen_bool(self.failure_probability) {
                return true;
            }

            debug!(task_id = %task.id, attempt, max_retries = task.max_retries, "attempt failed");
            if attempt < task.max_retries {
                sleep(self.backoff(attempt) + self.random_jitter()).await;
            }
        }
        false
    }
}
