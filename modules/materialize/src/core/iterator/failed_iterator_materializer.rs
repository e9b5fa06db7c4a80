use alloc::vec::Vec;

use super::IteratorMaterializer;
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
};

#[cfg(test)]
mod tests;

/// Sequence that failed; every operation re-delivers the same error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedIteratorMaterializer {
  error: MaterializeError,
}

impl FailedIteratorMaterializer {
  /// Creates a failed sequence.
  #[must_use]
  pub const fn new(error: MaterializeError) -> Self {
    Self { error }
  }

  /// Returns the failure.
  #[must_use]
  pub const fn error(&self) -> &MaterializeError {
    &self.error
  }
}

impl<E: Send> IteratorMaterializer<E> for FailedIteratorMaterializer {
  fn known_size(&self) -> Option<usize> {
    None
  }

  fn status(&self) -> MaterializerStatus {
    MaterializerStatus::Failed
  }

  fn is_materialized_at_once(&self) -> bool {
    true
  }

  fn materialize_cancel(&self, _error: MaterializeError) {}

  fn materialize_elements(&self, mut consumer: BoxFutureConsumer<Vec<E>>) {
    consumer.error(self.error.clone());
  }

  fn materialize_has_next(&self, mut consumer: BoxFutureConsumer<bool>) {
    consumer.error(self.error.clone());
  }

  fn materialize_next(&self, mut consumer: BoxIndexedFutureConsumer<E>) {
    consumer.error(self.error.clone());
  }

  fn materialize_next_while(&self, mut predicate: BoxIndexedFuturePredicate<E>) {
    predicate.error(self.error.clone());
  }

  fn materialize_skip(&self, _count: usize, mut consumer: BoxFutureConsumer<usize>) {
    consumer.error(self.error.clone());
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
