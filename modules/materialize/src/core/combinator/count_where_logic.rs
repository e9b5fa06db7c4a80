use core::marker::PhantomData;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Counts the upstream elements matching an indexed predicate.
pub struct CountWhereLogic<E, F> {
  predicate: F,
  count:     usize,
  _pd:       PhantomData<fn(E)>,
}

impl<E, F> CountWhereLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, count: 0, _pd: PhantomData }
  }
}

impl<E, F> AggregateLogic<E, usize> for CountWhereLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if (self.predicate)(index, &input) {
      self.count += 1;
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<usize>, MaterializeError> {
    Ok(Some(self.count))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
