use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Finds the last element matching an indexed predicate.
pub struct FindLastLogic<E, F> {
  predicate: F,
  found:     Option<E>,
}

impl<E, F> FindLastLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, found: None }
  }
}

impl<E, F> AggregateLogic<E, E> for FindLastLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      self.found = Some(input);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<E>, MaterializeError> {
    Ok(self.found.take())
  }
}
