use alloc::{collections::VecDeque, sync::Arc, vec::Vec};

use spin::Mutex;

use super::{IteratorMaterializer, realized_cursor, realized_cursor::RealizedCursor};
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
  context::SharedExecutionContext,
};


struct DequeCursor<E> {
  state: Mutex<(VecDeque<E>, usize)>,
}

impl<E: Send + 'static> RealizedCursor<E> for DequeCursor<E> {
  fn pull(&self) -> Option<(usize, E)> {
    let mut guard = self.state.lock();
    let (elements, position) = &mut *guard;
    let element = elements.pop_front()?;
    let index = *position;
    *position += 1;
    Some((index, element))
  }

  fn drain(&self) -> Vec<E> {
    let mut guard = self.state.lock();
    let (elements, position) = &mut *guard;
    *position += elements.len();
    elements.drain(..).collect()
  }

  fn advance(&self, count: usize) -> usize {
    let mut guard = self.state.lock();
    let (elements, position) = &mut *guard;
    let skipped = count.min(elements.len());
    elements.drain(..skipped);
    *position += skipped;
    skipped
  }

  fn has_remaining(&self) -> bool {
    !self.state.lock().0.is_empty()
  }

  fn remaining(&self) -> Option<usize> {
    Some(self.state.lock().0.len())
  }

  fn position(&self) -> usize {
    self.state.lock().1
  }
}

/// Realized sequence that consumes a `VecDeque` from the front.
pub struct DequeToIteratorMaterializer<E> {
  cursor:  Arc<DequeCursor<E>>,
  context: Option<SharedExecutionContext>,
}

impl<E: Send + 'static> DequeToIteratorMaterializer<E> {
  /// Creates a sequence over `elements`.
  #[must_use]
  pub fn new(elements: VecDeque<E>) -> Self {
    Self { cursor: Arc::new(DequeCursor { state: Mutex::new((elements, 0)) }), context: None }
  }

  /// Throttles `materialize_next_while` through `context`.
  #[must_use]
  pub fn with_context(mut self, context: SharedExecutionContext) -> Self {
    self.context = Some(context);
    self
  }
}

impl<E: Send + 'static> IteratorMaterializer<E> for DequeToIteratorMaterializer<E> {
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
