//! Construction-time configuration for the core.

use crate::error::TaskError;

/// Sizing knobs consumed by [`crate::TaskService::new`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Number of concurrent workers. Must be > 0.
    pub workers: usize,

    /// Intake queue capacity. Must be > 0.
    pub queue_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
        }
    }
}

impl CoreConfig {
    /// Fail-fast check at startup, before any task flows.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.workers == 0 {
            return Err(TaskError::Validation("workers must be > 0".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(TaskError::Validation(
                "queue capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
