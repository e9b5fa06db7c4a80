use alloc::{sync::Arc, vec::Vec};

use super::StatefulIteratorMaterializer;
use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
};

/// In-progress phase of a combinator installed in a [`StatefulIteratorMaterializer`].
///
/// Operations receive the owning machine so the state can transition it with
/// [`StatefulIteratorMaterializer::set_done`], [`StatefulIteratorMaterializer::set_failed`] or
/// [`StatefulIteratorMaterializer::set_cancelled`]. Once the machine is terminal it stops
/// dispatching to this state.
pub trait ImmaterialState<E>: Send + Sync {
  /// See [`IteratorMaterializer::known_size`](super::IteratorMaterializer::known_size).
  fn known_size(&self) -> Option<usize>;

  /// See
  /// [`IteratorMaterializer::is_materialized_at_once`](super::IteratorMaterializer::is_materialized_at_once).
  fn is_materialized_at_once(&self) -> bool;

  /// Propagates the cancellation upstream and transitions the machine.
  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError);

  /// Materializes every remaining element.
  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<Vec<E>>,
  );

  /// Materializes whether another element exists.
  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<bool>,
  );

  /// Materializes the next element.
  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxIndexedFutureConsumer<E>,
  );

  /// Materializes elements while the predicate asks for more.
  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    predicate: BoxIndexedFuturePredicate<E>,
  );

  /// Skips up to `count` elements.
  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  );

  /// Weight of a cancellation.
  fn weight_cancel(&self) -> usize {
    1
  }

  /// Weight of materializing every element.
  fn weight_elements(&self) -> usize;

  /// Weight of materializing `has_next`.
  fn weight_has_next(&self) -> usize;

  /// Weight of materializing the next element.
  fn weight_next(&self) -> usize;

  /// Weight of materializing while a predicate holds.
  fn weight_next_while(&self) -> usize;

  /// Weight of skipping.
  fn weight_skip(&self) -> usize;
}
