//! Protocol shared by materializers backed by an in-memory sequence.

use alloc::{sync::Arc, vec::Vec};

use crate::core::{
  LOG_TARGET, MaterializeError,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, invoke},
  context::{ContextTask, SharedExecutionContext, TaskId},
};

/// Task id used when a drain is throttled outside of any running task.
const DRAIN_TASK_ID: &str = "materialize-drain";

/// Pull cursor over a realized sequence.
pub(crate) trait RealizedCursor<E>: Send + Sync + 'static {
  /// Takes the next element together with its index.
  fn pull(&self) -> Option<(usize, E)>;

  /// Takes every remaining element.
  fn drain(&self) -> Vec<E>;

  /// Advances by up to `count` elements, returning how many were passed.
  fn advance(&self, count: usize) -> usize;

  /// Returns `true` while at least one element remains.
  fn has_remaining(&self) -> bool;

  /// Returns the number of remaining elements when known.
  fn remaining(&self) -> Option<usize>;

  /// Returns the index of the next element, which is also the number of elements produced.
  fn position(&self) -> usize;

  /// Returns the total size hint reported with each element.
  fn total(&self) -> Option<usize> {
    self.remaining().map(|remaining| remaining.saturating_add(self.position()))
  }
}

pub(crate) fn materialize_elements<E, C: RealizedCursor<E>>(cursor: &C, mut consumer: BoxFutureConsumer<Vec<E>>) {
  invoke::accept(consumer.as_mut(), cursor.drain());
}

pub(crate) fn materialize_has_next<E, C: RealizedCursor<E>>(cursor: &C, mut consumer: BoxFutureConsumer<bool>) {
  invoke::accept(consumer.as_mut(), cursor.has_remaining());
}

pub(crate) fn materialize_next<E, C: RealizedCursor<E>>(cursor: &C, mut consumer: BoxIndexedFutureConsumer<E>) {
  let total = cursor.total();
  match cursor.pull() {
    | Some((index, element)) => {
      invoke::accept_indexed(consumer.as_mut(), total, index, element);
    },
    | None => invoke::complete_indexed(consumer.as_mut(), cursor.position()),
  }
}

pub(crate) fn materialize_skip<E, C: RealizedCursor<E>>(
  cursor: &C,
  count: usize,
  mut consumer: BoxFutureConsumer<usize>,
) {
  invoke::accept(consumer.as_mut(), cursor.advance(count));
}

/// Feeds the predicate until it stops or the cursor is exhausted.
///
/// With an execution context, at most `min_throughput` elements are processed per call; the rest
/// of the drain is re-enqueued under the current task id so an interruption can stop it.
pub(crate) fn materialize_next_while<E, C>(
  cursor: Arc<C>,
  context: Option<SharedExecutionContext>,
  mut predicate: BoxIndexedFuturePredicate<E>,
) where
  E: Send + 'static,
  C: RealizedCursor<E>, {
  let mut processed = 0_usize;
  loop {
    if let Some(context) = context.as_ref() {
      let budget = context.min_throughput();
      if processed >= budget && cursor.has_remaining() {
        let task_id = context.current_task_id().unwrap_or_else(|| TaskId::from(DRAIN_TASK_ID));
        let weight = cursor.remaining().map_or(budget, |remaining| remaining.min(budget));
        let resume = ResumeDrain { cursor, context: context.clone(), predicate: Some(predicate) };
        context.schedule_after(ContextTask::boxed(task_id, weight, move || resume.run()));
        return;
      }
    }
    let total = cursor.total();
    let Some((index, element)) = cursor.pull() else {
      invoke::complete_predicate(predicate.as_mut(), cursor.position());
      return;
    };
    if !invoke::test_indexed(predicate.as_mut(), total, index, element) {
      return;
    }
    processed += 1;
  }
}

/// Rest of a throttled drain waiting for its next task execution.
///
/// Dropping it before it runs, as an interruption does, fails the predicate with
/// [`MaterializeError::Interrupted`].
struct ResumeDrain<E, C> {
  cursor:    Arc<C>,
  context:   SharedExecutionContext,
  predicate: Option<BoxIndexedFuturePredicate<E>>,
}

impl<E: Send + 'static, C: RealizedCursor<E>> ResumeDrain<E, C> {
  fn run(mut self) {
    if let Some(predicate) = self.predicate.take() {
      materialize_next_while(self.cursor.clone(), Some(self.context.clone()), predicate);
    }
  }
}

impl<E, C> Drop for ResumeDrain<E, C> {
  fn drop(&mut self) {
    if let Some(mut predicate) = self.predicate.take() {
      tracing::debug!(target: LOG_TARGET, "throttled drain interrupted");
      predicate.error(MaterializeError::Interrupted);
    }
  }
}
