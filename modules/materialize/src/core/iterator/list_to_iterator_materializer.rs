use alloc::{sync::Arc, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

use super::{IteratorMaterializer, realized_cursor, realized_cursor::RealizedCursor};
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
  context::SharedExecutionContext,
};

#[cfg(test)]
mod tests;

struct ListCursor<E> {
  elements: Vec<E>,
  offset:   usize,
  position: AtomicUsize,
}

impl<E: Clone + Send + Sync + 'static> RealizedCursor<E> for ListCursor<E> {
  fn pull(&self) -> Option<(usize, E)> {
    let len = self.elements.len();
    let position =
      self.position.fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| (p < len).then_some(p + 1)).ok()?;
    Some((self.offset + position, self.elements[position].clone()))
  }

  fn drain(&self) -> Vec<E> {
    let len = self.elements.len();
    let position = self.position.swap(len, Ordering::AcqRel).min(len);
    self.elements[position..].to_vec()
  }

  fn advance(&self, count: usize) -> usize {
    let len = self.elements.len();
    let previous = self
      .position
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| Some(p.saturating_add(count).min(len)))
      .unwrap_or(len);
    previous.saturating_add(count).min(len) - previous
  }

  fn has_remaining(&self) -> bool {
    self.position.load(Ordering::Acquire) < self.elements.len()
  }

  fn remaining(&self) -> Option<usize> {
    Some(self.elements.len().saturating_sub(self.position.load(Ordering::Acquire)))
  }

  fn position(&self) -> usize {
    self.offset + self.position.load(Ordering::Acquire).min(self.elements.len())
  }
}

/// Realized sequence backed by a `Vec`.
///
/// Indices start at the given offset, which lets a combinator freeze into the buffered remainder
/// of its output without renumbering. With an execution context, draining through
/// `materialize_next_while` yields every `min_throughput` elements.
pub struct ListToIteratorMaterializer<E> {
  cursor:  Arc<ListCursor<E>>,
  context: Option<SharedExecutionContext>,
}

impl<E: Clone + Send + Sync + 'static> ListToIteratorMaterializer<E> {
  /// Creates a sequence over `elements` starting at index 0.
  #[must_use]
  pub fn new(elements: Vec<E>) -> Self {
    Self::from_offset(elements, 0)
  }

  /// Creates a sequence over `elements` whose first index is `offset`.
  #[must_use]
  pub fn from_offset(elements: Vec<E>, offset: usize) -> Self {
    Self { cursor: Arc::new(ListCursor { elements, offset, position: AtomicUsize::new(0) }), context: None }
  }

  /// Throttles `materialize_next_while` through `context`.
  #[must_use]
  pub fn with_context(mut self, context: SharedExecutionContext) -> Self {
    self.context = Some(context);
    self
  }
}

impl<E: Clone + Send + Sync + 'static> IteratorMaterializer<E> for ListToIteratorMaterializer<E> {
  fn known_size(&self) -> Option<usize> {
    self.cursor.remaining()
  }

  fn status(&self) -> MaterializerStatus {
    MaterializerStatus::Done
  }

  fn is_materialized_at_once(&self) -> bool {
    true
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
