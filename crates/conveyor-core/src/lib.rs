//! conveyor-core
//!
//! Core building blocks for the conveyor task processor.
//!
//! - **task**: domain types (`Task`, `TaskState`)
//! - **error**: error taxonomy for the public operations
//! - **store**: state store port + in-memory implementation
//! - **queue**: bounded intake queue with close-on-shutdown
//! - **executor**: task execution port + simulated retry executor
//! - **pool**: fixed pool of workers draining the queue
//! - **service**: submission/query surface and shutdown coordination
//! - **config**: construction-time configuration

pub mod config;
pub mod error;
pub mod executor;
pub mod pool;
pub mod queue;
pub mod service;
pub mod store;
pub mod task;

pub use config::CoreConfig;
pub use error::TaskError;
pub use executor::{SimulatedExecutor, TaskExecutor};
pub use service::TaskService;
pub use store::{InMemoryStateStore, StateStore};
pub use task::{Task, TaskState};
