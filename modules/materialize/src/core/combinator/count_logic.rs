use core::marker::PhantomData;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Counts the upstream elements.
pub struct CountLogic<E> {
  count: usize,
  _pd:   PhantomData<fn(E)>,
}

impl<E> CountLogic<E> {
  /// Creates the logic.
  #[must_use]
  pub const fn new() -> Self {
    Self { count: 0, _pd: PhantomData }
  }
}

impl<E> Default for CountLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Send + 'static> AggregateLogic<E, usize> for CountLogic<E> {
  fn apply(&mut self, _index: usize, _input: E) -> Result<LogicFlow, MaterializeError> {
    self.count += 1;
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<usize>, MaterializeError> {
    Ok(Some(self.count))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
