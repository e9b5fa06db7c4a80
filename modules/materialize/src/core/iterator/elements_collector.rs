use alloc::vec::Vec;

use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, IndexedFuturePredicate, invoke},
};

#[cfg(test)]
mod tests;

/// Upper bound for pre-sizing from an advisory size hint.
const MAX_PRESIZE: usize = 1024;

/// Predicate collecting every element it is offered, then handing the list to a consumer.
///
/// Lets a combinator answer `materialize_elements` through its own `materialize_next_while`.
pub(crate) struct ElementsCollector<E> {
  elements: Vec<E>,
  consumer: Option<BoxFutureConsumer<Vec<E>>>,
}

impl<E> ElementsCollector<E> {
  pub(crate) fn new(consumer: BoxFutureConsumer<Vec<E>>) -> Self {
    Self { elements: Vec::new(), consumer: Some(consumer) }
  }
}

impl<E: Send> IndexedFuturePredicate<E> for ElementsCollector<E> {
  fn test(&mut self, size: Option<usize>, index: usize, element: E) -> Result<bool, MaterializeError> {
    if let (true, Some(size)) = (self.elements.is_empty(), size) {
      self.elements.reserve(size.saturating_sub(index).min(MAX_PRESIZE));
    }
    self.elements.push(element);
    Ok(true)
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    if let Some(mut consumer) = self.consumer.take() {
      invoke::accept(consumer.as_mut(), core::mem::take(&mut self.elements));
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut consumer) = self.consumer.take() {
      consumer.error(error);
    }
  }
}
