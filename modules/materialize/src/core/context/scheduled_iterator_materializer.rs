use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};

use spin::Mutex;

use super::{ContextTask, SharedExecutionContext, TaskId};
use crate::core::{
  CancelSignal, LOG_TARGET, MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
  iterator::{IteratorMaterializer, SharedIteratorMaterializer, pending_request::PendingRequest},
};

#[cfg(test)]
mod tests;

struct SlotTable<E> {
  next_slot: u64,
  slots:     BTreeMap<u64, PendingRequest<E>>,
}

struct ScheduledInner<E> {
  upstream: SharedIteratorMaterializer<E>,
  context:  SharedExecutionContext,
  task_id:  TaskId,
  cancel:   CancelSignal,
  table:    Mutex<SlotTable<E>>,
}

/// Dispatches every protocol operation of an upstream as a task on an execution context.
///
/// Each operation becomes one task weighted by the upstream's estimate for it, and every task
/// carries the same task id. Cancelling interrupts that id, fails the callbacks of tasks that have
/// not run yet and then cancels the upstream, which fails the callbacks it already holds.
pub struct ScheduledIteratorMaterializer<E> {
  inner: Arc<ScheduledInner<E>>,
}

impl<E> Clone for ScheduledIteratorMaterializer<E> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<E: Clone + Send + Sync + 'static> ScheduledIteratorMaterializer<E> {
  /// Wraps `upstream`, scheduling its operations on `context` under `task_id`.
  #[must_use]
  pub fn new(
    upstream: SharedIteratorMaterializer<E>,
    context: SharedExecutionContext,
    task_id: TaskId,
    cancel: CancelSignal,
  ) -> Self {
    Self {
      inner: Arc::new(ScheduledInner {
        upstream,
        context,
        task_id,
        cancel,
        table: Mutex::new(SlotTable { next_slot: 0, slots: BTreeMap::new() }),
      }),
    }
  }

  /// Returns the task id shared by every scheduled operation.
  #[must_use]
  pub fn task_id(&self) -> &TaskId {
    &self.inner.task_id
  }

  /// Returns the number of operations scheduled but not yet started.
  #[must_use]
  pub fn pending_operations(&self) -> usize {
    self.inner.table.lock().slots.len()
  }

  fn schedule(&self, weight: usize, request: PendingRequest<E>) {
    if let Some(error) = self.inner.cancel.error() {
      request.fail(error);
      return;
    }
    let slot = {
      let mut table = self.inner.table.lock();
      let slot = table.next_slot;
      table.next_slot += 1;
      table.slots.insert(slot, request);
      slot
    };
    let inner = self.inner.clone();
    self.inner.context.schedule_after(ContextTask::boxed(self.inner.task_id.clone(), weight, move || {
      let request = inner.table.lock().slots.remove(&slot);
      if let Some(request) = request {
        request.replay(&*inner.upstream);
      }
    }));
    // a cancellation may have drained the table before the slot was inserted
    if let Some(error) = self.inner.cancel.error() {
      self.fail_pending(&error);
    }
  }

  fn fail_pending(&self, error: &MaterializeError) {
    let slots = core::mem::take(&mut self.inner.table.lock().slots);
    for request in slots.into_values() {
      request.fail(error.clone());
    }
  }
}

impl<E: Clone + Send + Sync + 'static> IteratorMaterializer<E> for ScheduledIteratorMaterializer<E> {
  fn known_size(&self) -> Option<usize> {
    self.inner.upstream.known_size()
  }

  fn status(&self) -> MaterializerStatus {
    if self.inner.cancel.is_cancelled() {
      return MaterializerStatus::Cancelled;
    }
    self.inner.upstream.status()
  }

  fn is_materialized_at_once(&self) -> bool {
    self.inner.upstream.is_materialized_at_once()
  }

  fn materialize_cancel(&self, error: MaterializeError) {
    self.inner.cancel.cancel(error.clone());
    let error = self.inner.cancel.resolve(error);
    tracing::debug!(target: LOG_TARGET, task_id = &*self.inner.task_id, %error, "cancelling scheduled materializer");
    self.inner.context.interrupt_task(&self.inner.task_id);
    self.fail_pending(&error);
    self.inner.upstream.materialize_cancel(error);
  }

  fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>) {
    self.schedule(self.inner.upstream.weight_elements(), PendingRequest::elements(consumer));
  }

  fn materialize_has_next(&self, consumer: BoxFutureConsumer<bool>) {
    self.schedule(self.inner.upstream.weight_has_next(), PendingRequest::HasNext(consumer));
  }

  fn materialize_next(&self, consumer: BoxIndexedFutureConsumer<E>) {
    self.schedule(self.inner.upstream.weight_next(), PendingRequest::Next(consumer));
  }

  fn materialize_next_while(&self, predicate: BoxIndexedFuturePredicate<E>) {
    self.schedule(self.inner.upstream.weight_next_while(), PendingRequest::NextWhile(predicate));
  }

  fn materialize_skip(&self, count: usize, consumer: BoxFutureConsumer<usize>) {
    self.schedule(self.inner.upstream.weight_skip(), PendingRequest::skip(count, consumer));
  }

  fn weight_cancel(&self) -> usize {
    self.inner.upstream.weight_cancel()
  }

  fn weight_elements(&self) -> usize {
    self.inner.upstream.weight_elements()
  }

  fn weight_has_next(&self) -> usize {
    self.inner.upstream.weight_has_next()
  }

  fn weight_next(&self) -> usize {
    self.inner.upstream.weight_next()
  }

  fn weight_next_while(&self) -> usize {
    self.inner.upstream.weight_next_while()
  }

  fn weight_skip(&self) -> usize {
    self.inner.upstream.weight_skip()
  }
}
