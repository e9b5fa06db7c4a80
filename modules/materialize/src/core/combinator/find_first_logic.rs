use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Finds the first element matching an indexed predicate.
pub struct FindFirstLogic<E, F> {
  predicate: F,
  found:     Option<E>,
}

impl<E, F> FindFirstLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, found: None }
  }
}

impl<E, F> AggregateLogic<E, E> for FindFirstLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      self.found = Some(input);
      return Ok(LogicFlow::Stop);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<E>, MaterializeError> {
    Ok(self.found.take())
  }
}
