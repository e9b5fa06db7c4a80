use alloc::sync::Arc;

use super::{BoxExecutionTask, TaskId};

/// Scheduler consumed by materializers.
pub trait ExecutionContext: Send + Sync {
  /// Enqueues a task behind every task already queued.
  fn schedule_after(&self, task: BoxExecutionTask);

  /// Enqueues a task ahead of every task already queued.
  fn schedule_before(&self, task: BoxExecutionTask);

  /// Drops every queued task carrying `task_id`.
  fn interrupt_task(&self, task_id: &str);

  /// Returns the identity of the task currently running on this context.
  fn current_task_id(&self) -> Option<TaskId>;

  /// Returns the weight a task may consume before it has to re-enqueue itself.
  fn min_throughput(&self) -> usize;

  /// Returns `true` when called from a task running on this context.
  fn is_current(&self) -> bool;
}

/// Shared execution context handle.
pub type SharedExecutionContext = Arc<dyn ExecutionContext>;
