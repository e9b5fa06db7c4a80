use alloc::vec::Vec;

use super::ListMaterializer;
use crate::core::{
  MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, invoke},
};


/// List materializer over an in-memory `Vec`.
#[derive(Clone, Debug)]
pub struct ElementsToListMaterializer<E> {
  elements: Vec<E>,
}

impl<E> ElementsToListMaterializer<E> {
  /// Creates a list over `elements`.
  #[must_use]
  pub const fn new(elements: Vec<E>) -> Self {
    Self { elements }
  }
}

impl<E: Clone + Send + Sync> ListMaterializer<E> for ElementsToListMaterializer<E> {
  fn known_size(&self) -> Option<usize> {
    Some(self.elements.len())
  }

  fn status(&self) -> MaterializerStatus {
    MaterializerStatus::Done
  }

  fn is_materialized_at_once(&self) -> bool {
    true
  }

  fn materialize_cancel(&self, _error: MaterializeError) {}

  fn materialize_element(&self, index: usize, mut consumer: BoxIndexedFutureConsumer<E>) {
    let size = self.elements.len();
    match self.elements.get(index) {
      | Some(element) => {
        invoke::accept_indexed(consumer.as_mut(), Some(size), index, element.clone());
      },
      | None => invoke::complete_indexed(consumer.as_mut(), size),
    }
  }

  fn materialize_elements(&self, mut consumer: BoxFutureConsumer<Vec<E>>) {
    invoke::accept(consumer.as_mut(), self.elements.clone());
  }

  fn materialize_has_element(&self, index: usize, mut consumer: BoxFutureConsumer<bool>) {
    invoke::accept(consumer.as_mut(), index < self.elements.len());
  }

  fn materialize_size(&self, mut consumer: BoxFutureConsumer<usize>) {
    invoke::accept(consumer.as_mut(), self.elements.len());
  }

  fn weight_element(&self) -> usize {
    1
  }

  fn weight_elements(&self) -> usize {
    self.elements.len().max(1)
  }

  fn weight_has_element(&self) -> usize {
    1
  }

  fn weight_size(&self) -> usize {
    1
  }
}
