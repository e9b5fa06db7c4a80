use alloc::collections::VecDeque;
use core::marker::PhantomData;

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;

/// Keeps the elements matching an indexed predicate.
pub struct FilterLogic<E, F> {
  predicate: F,
  _pd:       PhantomData<fn(E)>,
}

impl<E, F> FilterLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, _pd: PhantomData }
  }
}

impl<E, F> TransformLogic<E, E> for FilterLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E, output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      output.push_back(input);
    }
    Ok(LogicFlow::Continue)
  }

  fn remaining(&self, upstream: Option<usize>) -> Option<usize> {
    upstream.filter(|remaining| *remaining == 0)
  }
}
