use alloc::{boxed::Box, sync::Arc};

/// Identity shared by every task of one scheduled chain.
pub type TaskId = Arc<str>;

/// Unit of work submitted to an [`ExecutionContext`](super::ExecutionContext).
pub trait ExecutionTask: Send {
  /// Returns the identity used for targeted interruption.
  fn task_id(&self) -> &TaskId;

  /// Returns the estimated amount of work performed by [`ExecutionTask::run`].
  fn weight(&self) -> usize;

  /// Executes the task.
  fn run(self: Box<Self>);
}

/// Boxed task.
pub type BoxExecutionTask = Box<dyn ExecutionTask>;
