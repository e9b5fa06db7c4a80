use alloc::vec::Vec;

use super::IteratorMaterializer;
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, invoke},
};

#[cfg(test)]
mod tests;

/// Exhausted sequence.
///
/// `size` is the element count reported by `complete`, which lets a combinator freeze into an
/// empty state after it already emitted elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyIteratorMaterializer {
  size: usize,
}

impl EmptyIteratorMaterializer {
  /// Creates an empty sequence that never produced anything.
  #[must_use]
  pub const fn new() -> Self {
    Self { size: 0 }
  }

  /// Creates an exhausted sequence that produced `size` elements.
  #[must_use]
  pub const fn exhausted(size: usize) -> Self {
    Self { size }
  }
}

impl<E: Send> IteratorMaterializer<E> for EmptyIteratorMaterializer {
  fn known_size(&self) -> Option<usize> {
    Some(0)
  }

  fn status(&self) -> MaterializerStatus {
    MaterializerStatus::Done
  }

  fn is_materialized_at_once(&self) -> bool {
    true
  }

  fn materialize_cancel(&self, _error: MaterializeError) {}

  fn materialize_elements(&self, mut consumer: BoxFutureConsumer<Vec<E>>) {
    invoke::accept(consumer.as_mut(), Vec::new());
  }

  fn materialize_has_next(&self, mut consumer: BoxFutureConsumer<bool>) {
    invoke::accept(consumer.as_mut(), false);
  }

  fn materialize_next(&self, mut consumer: BoxIndexedFutureConsumer<E>) {
    invoke::complete_indexed(consumer.as_mut(), self.size);
  }

  fn materialize_next_while(&self, mut predicate: BoxIndexedFuturePredicate<E>) {
    invoke::complete_predicate(predicate.as_mut(), self.size);
  }

  fn materialize_skip(&self, _count: usize, mut consumer: BoxFutureConsumer<usize>) {
    invoke::accept(consumer.as_mut(), 0);
  }

  fn weight_elements(&self) -> usize {
    1
  }

  fn weight_has_next(&self) -> usize {
    1
  }

  fn weight_next(&self) -> usize {
    1
  }

  fn weight_next_while(&self) -> usize {
    1
  }

  fn weight_skip(&self) -> usize {
    1
  }
}
