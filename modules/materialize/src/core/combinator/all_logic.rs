use core::marker::PhantomData;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Answers whether every element matches; stops at the first mismatch.
pub struct AllLogic<E, F> {
  predicate: F,
  holds:     bool,
  _pd:       PhantomData<fn(E)>,
}

impl<E, F> AllLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, holds: true, _pd: PhantomData }
  }
}

impl<E, F> AggregateLogic<E, bool> for AllLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      return Ok(LogicFlow::Continue);
    }
    self.holds = false;
    Ok(LogicFlow::Stop)
  }

  fn finish(&mut self) -> Result<Option<bool>, MaterializeError> {
    Ok(Some(self.holds))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
