extern crate std;

use alloc::sync::Arc;

use portable_atomic::{AtomicUsize, Ordering};
use tokio::{runtime::Handle, sync::Notify, task::JoinHandle};

use crate::core::{
  LOG_TARGET,
  context::{
    BoxExecutionTask, ExecutionContext, ExecutionContextConfig, SerialExecutionContext, SharedExecutionContext, TaskId,
  },
};

#[cfg(test)]
mod tests;

tokio::task_local! {
  static RUNNING_CONTEXT: usize;
}

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(1);

struct Driver {
  id:     usize,
  serial: SerialExecutionContext,
  wake:   Notify,
}

impl Driver {
  async fn run(self: Arc<Self>) {
    let batch = self.serial.config().min_throughput();
    loop {
      self.wake.notified().await;
      loop {
        let ran = RUNNING_CONTEXT.sync_scope(self.id, || self.serial.run_batch(batch));
        if ran == 0 {
          break;
        }
        tracing::trace!(target: LOG_TARGET, context = self.serial.config().name(), ran, "ran batch");
        tokio::task::yield_now().await;
      }
    }
  }
}

struct WorkerGuard {
  worker: JoinHandle<()>,
}

impl Drop for WorkerGuard {
  fn drop(&mut self) {
    self.worker.abort();
  }
}

/// Execution context whose tasks run on a dedicated tokio task.
///
/// Scheduling wakes the worker, which runs queued tasks in batches of the configured minimum
/// throughput and yields to the runtime between batches. The worker is aborted once every handle
/// to the context is dropped.
#[derive(Clone)]
pub struct TokioExecutionContext {
  driver: Arc<Driver>,
  _guard: Arc<WorkerGuard>,
}

impl TokioExecutionContext {
  /// Spawns the worker on `handle`.
  #[must_use]
  pub fn new(handle: &Handle, config: ExecutionContextConfig) -> Self {
    let driver = Arc::new(Driver {
      id:     NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
      serial: SerialExecutionContext::new(config),
      wake:   Notify::new(),
    });
    let worker = handle.spawn(driver.clone().run());
    Self { driver, _guard: Arc::new(WorkerGuard { worker }) }
  }

  /// Returns a shared handle to this context.
  #[must_use]
  pub fn shared(&self) -> SharedExecutionContext {
    Arc::new(self.clone())
  }

  /// Returns the configuration.
  #[must_use]
  pub fn config(&self) -> &ExecutionContextConfig {
    self.driver.serial.config()
  }

  /// Returns the number of queued tasks.
  #[must_use]
  pub fn pending_tasks(&self) -> usize {
    self.driver.serial.pending_tasks()
  }

  /// Returns the number of tasks executed so far.
  #[must_use]
  pub fn executed_tasks(&self) -> usize {
    self.driver.serial.executed_tasks()
  }
}

impl ExecutionContext for TokioExecutionContext {
  fn schedule_after(&self, task: BoxExecutionTask) {
    self.driver.serial.schedule_after(task);
    self.driver.wake.notify_one();
  }

  fn schedule_before(&self, task: BoxExecutionTask) {
    self.driver.serial.schedule_before(task);
    self.driver.wake.notify_one();
  }

  fn interrupt_task(&self, task_id: &str) {
    self.driver.serial.interrupt_task(task_id);
  }

  fn current_task_id(&self) -> Option<TaskId> {
    // ids of tasks running on the worker are only meaningful to the worker itself
    if self.is_current() { self.driver.serial.current_task_id() } else { None }
  }

  fn min_throughput(&self) -> usize {
    self.driver.serial.min_throughput()
  }

  fn is_current(&self) -> bool {
    RUNNING_CONTEXT.try_with(|id| *id == self.driver.id).unwrap_or(false)
  }
}
