//! Cooperative scheduling contract.
//!
//! Work is submitted as weighted tasks tagged with a task id. A task may process up to the
//! context's minimum throughput worth of weight before it has to re-enqueue itself under the same
//! id, which lets an interruption by id stop the rest of a chain.

/// Closure-backed task.
mod context_task;
/// Execution context trait.
mod execution_context;
/// Execution context configuration.
mod execution_context_config;
/// Task trait.
mod execution_task;
/// Materializer dispatching every operation as a task.
mod scheduled_iterator_materializer;
/// Deterministic single-queue context.
mod serial_execution_context;

pub use context_task::ContextTask;
pub use execution_context::{ExecutionContext, SharedExecutionContext};
pub use execution_context_config::{DEFAULT_MIN_THROUGHPUT, ExecutionContextConfig};
pub use execution_task::{BoxExecutionTask, ExecutionTask, TaskId};
pub use scheduled_iterator_materializer::ScheduledIteratorMaterializer;
pub use serial_execution_context::SerialExecutionContext;
