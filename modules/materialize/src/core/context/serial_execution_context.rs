use alloc::{collections::VecDeque, sync::Arc};

use portable_atomic::{AtomicUsize, Ordering};
use spin::Mutex;

use super::{BoxExecutionTask, ExecutionContext, ExecutionContextConfig, SharedExecutionContext, TaskId};
use crate::core::LOG_TARGET;


struct SerialInner {
  config:   ExecutionContextConfig,
  queue:    Mutex<VecDeque<BoxExecutionTask>>,
  current:  Mutex<Option<TaskId>>,
  executed: AtomicUsize,
}

/// Deterministic execution context running queued tasks one at a time on the caller's thread.
///
/// Nothing runs until [`SerialExecutionContext::run_next`], [`SerialExecutionContext::run_batch`]
/// or [`SerialExecutionContext::run_until_idle`] is called, which makes task counts observable.
/// [`ExecutionContext::is_current`] reports whether a task of this context is executing.
#[derive(Clone)]
pub struct SerialExecutionContext {
  inner: Arc<SerialInner>,
}

impl SerialExecutionContext {
  /// Creates an idle context.
  #[must_use]
  pub fn new(config: ExecutionContextConfig) -> Self {
    Self {
      inner: Arc::new(SerialInner {
        config,
        queue: Mutex::new(VecDeque::new()),
        current: Mutex::new(None),
        executed: AtomicUsize::new(0),
      }),
    }
  }

  /// Returns the configuration.
  #[must_use]
  pub fn config(&self) -> &ExecutionContextConfig {
    &self.inner.config
  }

  /// Returns a shared handle to this context.
  #[must_use]
  pub fn shared(&self) -> SharedExecutionContext {
    Arc::new(self.clone())
  }

  /// Runs the task at the head of the queue. Returns `false` when the queue was empty.
  pub fn run_next(&self) -> bool {
    let next = self.inner.queue.lock().pop_front();
    let Some(task) = next else {
      return false;
    };
    let task_id = task.task_id().clone();
    tracing::trace!(
      target: LOG_TARGET,
      context = self.inner.config.name(),
      task_id = &*task_id,
      weight = task.weight(),
      "running task"
    );
    let previous = self.inner.current.lock().replace(task_id);
    task.run();
    *self.inner.current.lock() = previous;
    self.inner.executed.fetch_add(1, Ordering::AcqRel);
    true
  }

  /// Runs up to `limit` tasks, returning how many ran.
  pub fn run_batch(&self, limit: usize) -> usize {
    let mut ran = 0;
    while ran < limit && self.run_next() {
      ran += 1;
    }
    ran
  }

  /// Runs tasks until the queue is empty, including tasks enqueued while running.
  pub fn run_until_idle(&self) -> usize {
    let mut ran = 0;
    while self.run_next() {
      ran += 1;
    }
    ran
  }

  /// Returns the number of queued tasks.
  #[must_use]
  pub fn pending_tasks(&self) -> usize {
    self.inner.queue.lock().len()
  }

  /// Returns the number of tasks executed so far.
  #[must_use]
  pub fn executed_tasks(&self) -> usize {
    self.inner.executed.load(Ordering::Acquire)
  }
}

impl ExecutionContext for SerialExecutionContext {
  fn schedule_after(&self, task: BoxExecutionTask) {
    self.inner.queue.lock().push_back(task);
  }

  fn schedule_before(&self, task: BoxExecutionTask) {
    self.inner.queue.lock().push_front(task);
  }

  fn interrupt_task(&self, task_id: &str) {
    let removed: VecDeque<BoxExecutionTask> = {
      let mut queue = self.inner.queue.lock();
      let (kept, removed): (VecDeque<_>, VecDeque<_>) =
        core::mem::take(&mut *queue).into_iter().partition(|task| &**task.task_id() != task_id);
      *queue = kept;
      removed
    };
    tracing::debug!(
      target: LOG_TARGET,
      context = self.inner.config.name(),
      task_id,
      removed = removed.len(),
      "interrupted task"
    );
    // removed tasks may fail their callbacks on drop, which can schedule again
    drop(removed);
  }

  fn current_task_id(&self) -> Option<TaskId> {
    self.inner.current.lock().clone()
  }

  fn min_throughput(&self) -> usize {
    self.inner.config.min_throughput()
  }

  fn is_current(&self) -> bool {
    self.inner.current.lock().is_some()
  }
}
