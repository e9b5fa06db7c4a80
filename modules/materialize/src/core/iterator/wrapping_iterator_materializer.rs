use alloc::{boxed::Box, sync::Arc, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

use super::{IteratorMaterializer, SharedIteratorMaterializer};
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{
    BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer, IndexedFutureConsumer,
    IndexedFuturePredicate,
  },
  shift_size,
};


/// Forwards to an already materialized upstream while renumbering indices.
///
/// The first forwarded element gets index `base`; sizes are shifted accordingly. Combinators freeze
/// into this state once nothing is left for them to do but delegate to what remains upstream.
pub struct WrappingIteratorMaterializer<E> {
  wrapped:    SharedIteratorMaterializer<E>,
  next_index: Arc<AtomicUsize>,
}

impl<E: Send + 'static> WrappingIteratorMaterializer<E> {
  /// Wraps `wrapped`, numbering its elements from `base`.
  #[must_use]
  pub fn new(wrapped: SharedIteratorMaterializer<E>, base: usize) -> Self {
    Self { wrapped, next_index: Arc::new(AtomicUsize::new(base)) }
  }

  /// Wraps `wrapped` and returns a shared handle.
  #[must_use]
  pub fn shared(wrapped: SharedIteratorMaterializer<E>, base: usize) -> SharedIteratorMaterializer<E> {
    Arc::new(Self::new(wrapped, base))
  }
}

struct RenumberingConsumer<E> {
  downstream: BoxIndexedFutureConsumer<E>,
  next_index: Arc<AtomicUsize>,
}

impl<E: Send> IndexedFutureConsumer<E> for RenumberingConsumer<E> {
  fn accept(&mut self, size: Option<usize>, index: usize, element: E) -> Result<(), MaterializeError> {
    let renumbered = self.next_index.fetch_add(1, Ordering::AcqRel);
    self.downstream.accept(shift_size(size, index, renumbered), renumbered, element)
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    self.downstream.complete(self.next_index.load(Ordering::Acquire))
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(error);
  }
}

struct RenumberingPredicate<E> {
  downstream: BoxIndexedFuturePredicate<E>,
  next_index: Arc<AtomicUsize>,
}

impl<E: Send> IndexedFuturePredicate<E> for RenumberingPredicate<E> {
  fn test(&mut self, size: Option<usize>, index: usize, element: E) -> Result<bool, MaterializeError> {
    let renumbered = self.next_index.fetch_add(1, Ordering::AcqRel);
    self.downstream.test(shift_size(size, index, renumbered), renumbered, element)
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    self.downstream.complete(self.next_index.load(Ordering::Acquire))
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(error);
  }
}

struct CountingConsumer<P> {
  downstream: BoxFutureConsumer<P>,
  next_index: Arc<AtomicUsize>,
  count:      fn(&P) -> usize,
}

impl<P: Send> FutureConsumer<P> for CountingConsumer<P> {
  fn accept(&mut self, value: P) -> Result<(), MaterializeError> {
    self.next_index.fetch_add((self.count)(&value), Ordering::AcqRel);
    self.downstream.accept(value)
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(error);
  }
}

impl<E: Send + 'static> IteratorMaterializer<E> for WrappingIteratorMaterializer<E> {
  fn known_size(&self) -> Option<usize> {
    self.wrapped.known_size()
  }

  fn status(&self) -> MaterializerStatus {
    self.wrapped.status()
  }

  fn is_materialized_at_once(&self) -> bool {
    self.wrapped.is_materialized_at_once()
  }

  fn materialize_cancel(&self, error: MaterializeError) {
    self.wrapped.materialize_cancel(error);
  }

  fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>) {
    self.wrapped.materialize_elements(Box::new(CountingConsumer {
      downstream: consumer,
      next_index: self.next_index.clone(),
      count:      Vec::len,
    }));
  }

  fn materialize_has_next(&self, consumer: BoxFutureConsumer<bool>) {
    self.wrapped.materialize_has_next(consumer);
  }

  fn materialize_next(&self, consumer: BoxIndexedFutureConsumer<E>) {
    self
      .wrapped
      .materialize_next(Box::new(RenumberingConsumer { downstream: consumer, next_index: self.next_index.clone() }));
  }

  fn materialize_next_while(&self, predicate: BoxIndexedFuturePredicate<E>) {
    self
      .wrapped
      .materialize_next_while(Box::new(RenumberingPredicate {
        downstream: predicate,
        next_index: self.next_index.clone(),
      }));
  }

  fn materialize_skip(&self, count: usize, consumer: BoxFutureConsumer<usize>) {
    self.wrapped.materialize_skip(
      count,
      Box::new(CountingConsumer {
        downstream: consumer,
        next_index: self.next_index.clone(),
        count:      |skipped| *skipped,
      }),
    );
  }

  fn weight_cancel(&self) -> usize {
    self.wrapped.weight_cancel()
  }

  fn weight_elements(&self) -> usize {
    self.wrapped.weight_elements()
  }

  fn weight_has_next(&self) -> usize {
    self.wrapped.weight_has_next()
  }

  fn weight_next(&self) -> usize {
    self.wrapped.weight_next()
  }

  fn weight_next_while(&self) -> usize {
    self.wrapped.weight_next_while()
  }

  fn weight_skip(&self) -> usize {
    self.wrapped.weight_skip()
  }
}
