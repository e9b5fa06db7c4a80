use alloc::boxed::Box;

use super::{BoxExecutionTask, ExecutionTask, TaskId};


/// Task running a closure.
pub struct ContextTask {
  task_id: TaskId,
  weight:  usize,
  body:    Box<dyn FnOnce() + Send>,
}

impl ContextTask {
  /// Creates a task with the given identity and weight.
  #[must_use]
  pub fn new<F>(task_id: TaskId, weight: usize, body: F) -> Self
  where
    F: FnOnce() + Send + 'static, {
    Self { task_id, weight, body: Box::new(body) }
  }

  /// Creates the task and boxes it.
  #[must_use]
  pub fn boxed<F>(task_id: TaskId, weight: usize, body: F) -> BoxExecutionTask
  where
    F: FnOnce() + Send + 'static, {
    Box::new(Self::new(task_id, weight, body))
  }
}

impl ExecutionTask for ContextTask {
  fn task_id(&self) -> &TaskId {
    &self.task_id
  }

  fn weight(&self) -> usize {
    self.weight
  }

  fn run(self: Box<Self>) {
    (self.body)();
  }
}
