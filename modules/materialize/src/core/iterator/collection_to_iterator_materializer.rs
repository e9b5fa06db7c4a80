use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::iter::Peekable;

use spin::Mutex;

use super::{IteratorMaterializer, realized_cursor, realized_cursor::RealizedCursor};
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
  context::SharedExecutionContext,
};

#[cfg(test)]
mod tests;

type BoxIterator<E> = Box<dyn Iterator<Item = E> + Send>;

struct CollectionCursor<E> {
  state: Mutex<(Peekable<BoxIterator<E>>, usize)>,
}

impl<E: Send + 'static> RealizedCursor<E> for CollectionCursor<E> {
  fn pull(&self) -> Option<(usize, E)> {
    let mut guard = self.state.lock();
    let (iter, position) = &mut *guard;
    let element = iter.next()?;
    let index = *position;
    *position += 1;
    Some((index, element))
  }

  fn drain(&self) -> Vec<E> {
    let mut guard = self.state.lock();
    let (iter, position) = &mut *guard;
    let elements: Vec<E> = iter.collect();
    *position += elements.len();
    elements
  }

  fn advance(&self, count: usize) -> usize {
    let mut guard = self.state.lock();
    let (iter, position) = &mut *guard;
    let skipped = iter.take(count).count();
    *position += skipped;
    skipped
  }

  fn has_remaining(&self) -> bool {
    self.state.lock().0.peek().is_some()
  }

  fn remaining(&self) -> Option<usize> {
    match self.state.lock().0.size_hint() {
      | (lower, Some(upper)) if lower == upper => Some(lower),
      | _ => None,
    }
  }

  fn position(&self) -> usize {
    self.state.lock().1
  }
}

/// Realized sequence pulling from an arbitrary iterator.
///
/// The known size is reported only when the iterator's size hint is exact.
pub struct CollectionToIteratorMaterializer<E> {
  cursor:  Arc<CollectionCursor<E>>,
  context: Option<SharedExecutionContext>,
}

impl<E: Send + 'static> CollectionToIteratorMaterializer<E> {
  /// Creates a sequence over the items of `iter`.
  #[must_use]
  pub fn new<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = E>,
    I::IntoIter: Send + 'static, {
    let iter: BoxIterator<E> = Box::new(iter.into_iter());
    Self { cursor: Arc::new(CollectionCursor { state: Mutex::new((iter.peekable(), 0)) }), context: None }
  }

  /// Throttles `materialize_next_while` through `context`.
  #[must_use]
  pub fn with_context(mut self, context: SharedExecutionContext) -> Self {
    self.context = Some(context);
    self
  }
}

impl<E: Send + 'static> IteratorMaterializer<E> for CollectionToIteratorMaterializer<E> {
  fn known_size(&self) -> Option<usize> {
    self.cursor.remaining()
  }

  fn status(&self) -> MaterializerStatus {
    MaterializerStatus::Done
  }

  fn is_materialized_at_once(&self) -> bool {
    false
  }

  fn materialize_cancel(&self, _error: MaterializeError) {}

  fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>) {
    realized_cursor::materialize_elements(&*self.cursor, consumer);
  }

  fn materialize_has_next(&self, consumer: BoxFutureConsumer<bool>) {
    realized_cursor::materialize_has_next(&*self.cursor, consumer);
  }

  fn materialize_next(&self, consumer: BoxIndexedFutureConsumer<E>) {
    realized_cursor::materialize_next(&*self.cursor, consumer);
  }

  fn materialize_next_while(&self, predicate: BoxIndexedFuturePredicate<E>) {
    realized_cursor::materialize_next_while(self.cursor.clone(), self.context.clone(), predicate);
  }

  fn materialize_skip(&self, count: usize, consumer: BoxFutureConsumer<usize>) {
    realized_cursor::materialize_skip(&*self.cursor, count, consumer);
  }

  fn weight_elements(&self) -> usize {
    self.cursor.remaining().unwrap_or(1).max(1)
  }

  fn weight_has_next(&self) -> usize {
    1
  }

  fn weight_next(&self) -> usize {
    1
  }

  fn weight_next_while(&self) -> usize {
    self.cursor.remaining().unwrap_or(1).max(1)
  }

  fn weight_skip(&self) -> usize {
    1
  }
}
