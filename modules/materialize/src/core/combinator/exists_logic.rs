use core::marker::PhantomData;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Answers whether any element matches; stops at the first match.
pub struct ExistsLogic<E, F> {
  predicate: F,
  found:     bool,
  _pd:       PhantomData<fn(E)>,
}

impl<E, F> ExistsLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, found: false, _pd: PhantomData }
  }
}

impl<E, F> AggregateLogic<E, bool> for ExistsLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      self.found = true;
      return Ok(LogicFlow::Stop);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<bool>, MaterializeError> {
    Ok(Some(self.found))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
