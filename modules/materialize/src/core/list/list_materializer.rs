use alloc::{sync::Arc, vec::Vec};

use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer},
};

/// Deferred, index-addressable sequence.
pub trait ListMaterializer<E>: Send + Sync {
  /// Returns the list size when known without materializing.
  fn known_size(&self) -> Option<usize>;

  /// Returns the lifecycle status.
  fn status(&self) -> MaterializerStatus;

  /// Returns `true` when realizing the list is a single step.
  fn is_materialized_at_once(&self) -> bool;

  /// Cancels materialization.
  fn materialize_cancel(&self, error: MaterializeError);

  /// Materializes the element at `index`; completes with the list size when out of range.
  fn materialize_element(&self, index: usize, consumer: BoxIndexedFutureConsumer<E>);

  /// Materializes every element.
  fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>);

  /// Materializes whether an element exists at `index`.
  fn materialize_has_element(&self, index: usize, consumer: BoxFutureConsumer<bool>);

  /// Materializes the list size.
  fn materialize_size(&self, consumer: BoxFutureConsumer<usize>);

  /// Weight of [`ListMaterializer::materialize_element`].
  fn weight_element(&self) -> usize;

  /// Weight of [`ListMaterializer::materialize_elements`].
  fn weight_elements(&self) -> usize;

  /// Weight of [`ListMaterializer::materialize_has_element`].
  fn weight_has_element(&self) -> usize;

  /// Weight of [`ListMaterializer::materialize_size`].
  fn weight_size(&self) -> usize;
}

/// Shared list materializer handle.
pub type SharedListMaterializer<E> = Arc<dyn ListMaterializer<E>>;
