use alloc::{sync::Arc, vec::Vec};

use crate::core::{
  MaterializeError,
  callback::BoxFutureConsumer,
  iterator::SharedIteratorMaterializer,
  list::{ElementsToListMaterializer, SharedListMaterializer},
};

/// Second input of a two-source combinator, such as the needle of a slice search.
///
/// It is always materialized in full before the first element of the primary source is
/// classified.
pub enum SecondarySource<E> {
  /// Sequential source.
  Iterator(SharedIteratorMaterializer<E>),
  /// Random-access source.
  List(SharedListMaterializer<E>),
}

impl<E> Clone for SecondarySource<E> {
  fn clone(&self) -> Self {
    match self {
      | Self::Iterator(source) => Self::Iterator(source.clone()),
      | Self::List(source) => Self::List(source.clone()),
    }
  }
}

impl<E: Clone + Send + Sync + 'static> SecondarySource<E> {
  /// Creates a random-access source over `elements`.
  #[must_use]
  pub fn from_elements(elements: Vec<E>) -> Self {
    Self::List(Arc::new(ElementsToListMaterializer::new(elements)))
  }
}

impl<E> SecondarySource<E> {
  /// Materializes every element of the source.
  pub fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>) {
    match self {
      | Self::Iterator(source) => source.materialize_elements(consumer),
      | Self::List(source) => source.materialize_elements(consumer),
    }
  }

  /// Cancels the source.
  pub fn materialize_cancel(&self, error: MaterializeError) {
    match self {
      | Self::Iterator(source) => source.materialize_cancel(error),
      | Self::List(source) => source.materialize_cancel(error),
    }
  }

  /// Returns the source size when known.
  #[must_use]
  pub fn known_size(&self) -> Option<usize> {
    match self {
      | Self::Iterator(source) => source.known_size(),
      | Self::List(source) => source.known_size(),
    }
  }

  /// Returns `true` when the source realizes in a single step.
  #[must_use]
  pub fn is_materialized_at_once(&self) -> bool {
    match self {
      | Self::Iterator(source) => source.is_materialized_at_once(),
      | Self::List(source) => source.is_materialized_at_once(),
    }
  }

  /// Weight of materializing every element.
  #[must_use]
  pub fn weight_elements(&self) -> usize {
    match self {
      | Self::Iterator(source) => source.weight_elements(),
      | Self::List(source) => source.weight_elements(),
    }
  }
}

impl<E> From<SharedIteratorMaterializer<E>> for SecondarySource<E> {
  fn from(source: SharedIteratorMaterializer<E>) -> Self {
    Self::Iterator(source)
  }
}

impl<E> From<SharedListMaterializer<E>> for SecondarySource<E> {
  fn from(source: SharedListMaterializer<E>) -> Self {
    Self::List(source)
  }
}

impl<E: Clone + Send + Sync + 'static> From<Vec<E>> for SecondarySource<E> {
  fn from(elements: Vec<E>) -> Self {
    Self::from_elements(elements)
  }
}
