use core::marker::PhantomData;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Finds the index of the last element matching an indexed predicate.
pub struct FindLastIndexLogic<E, F> {
  predicate: F,
  found:     Option<usize>,
  _pd:       PhantomData<fn(E)>,
}

impl<E, F> FindLastIndexLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, found: None, _pd: PhantomData }
  }
}

impl<E, F> AggregateLogic<E, usize> for FindLastIndexLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      self.found = Some(index);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<usize>, MaterializeError> {
    Ok(self.found)
  }
}
