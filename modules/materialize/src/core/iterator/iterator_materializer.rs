use alloc::{sync::Arc, vec::Vec};

use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
};

/// Deferred, pull-based sequence exposing the materialization protocol.
///
/// Every operation answers through the callback it receives, either synchronously or later from
/// an upstream callback. Weights are advisory cost estimates consulted by execution contexts.
pub trait IteratorMaterializer<E>: Send + Sync {
  /// Returns the number of remaining elements when known without materializing.
  fn known_size(&self) -> Option<usize>;

  /// Returns the lifecycle status.
  fn status(&self) -> MaterializerStatus;

  /// Returns `true` once the status is terminal.
  fn is_done(&self) -> bool {
    self.status().is_terminal()
  }

  /// Returns `true` when materialization completed successfully.
  fn is_succeeded(&self) -> bool {
    self.status() == MaterializerStatus::Done
  }

  /// Returns `true` when materialization failed or was cancelled.
  fn is_failed(&self) -> bool {
    matches!(self.status(), MaterializerStatus::Failed | MaterializerStatus::Cancelled)
  }

  /// Returns `true` when materialization was cancelled.
  fn is_cancelled(&self) -> bool {
    self.status() == MaterializerStatus::Cancelled
  }

  /// Returns `true` when realizing the sequence is a single step rather than incremental.
  fn is_materialized_at_once(&self) -> bool;

  /// Cancels materialization, failing every outstanding callback with `error`.
  fn materialize_cancel(&self, error: MaterializeError);

  /// Materializes every remaining element.
  fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>);

  /// Materializes whether at least one more element exists, without consuming it.
  fn materialize_has_next(&self, consumer: BoxFutureConsumer<bool>);

  /// Materializes the next element, or completion when none is left.
  fn materialize_next(&self, consumer: BoxIndexedFutureConsumer<E>);

  /// Materializes elements for as long as the predicate asks for more.
  fn materialize_next_while(&self, predicate: BoxIndexedFuturePredicate<E>);

  /// Skips up to `count` elements, reporting how many were skipped.
  fn materialize_skip(&self, count: usize, consumer: BoxFutureConsumer<usize>);

  /// Weight of [`IteratorMaterializer::materialize_cancel`].
  fn weight_cancel(&self) -> usize {
    1
  }

  /// Weight of [`IteratorMaterializer::materialize_elements`].
  fn weight_elements(&self) -> usize;

  /// Weight of [`IteratorMaterializer::materialize_has_next`].
  fn weight_has_next(&self) -> usize;

  /// Weight of [`IteratorMaterializer::materialize_next`].
  fn weight_next(&self) -> usize;

  /// Weight of [`IteratorMaterializer::materialize_next_while`].
  fn weight_next_while(&self) -> usize;

  /// Weight of [`IteratorMaterializer::materialize_skip`].
  fn weight_skip(&self) -> usize;
}

/// Shared materializer handle.
pub type SharedIteratorMaterializer<E> = Arc<dyn IteratorMaterializer<E>>;
