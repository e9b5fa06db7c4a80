use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Reduces the elements from the first to the last. An empty upstream realizes an empty result.
pub struct ReduceLeftLogic<E, F> {
  accumulator: Option<E>,
  reduce:      F,
}

impl<E, F> ReduceLeftLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(reduce: F) -> Self {
    Self { accumulator: None, reduce }
  }
}

impl<E, F> AggregateLogic<E, E> for ReduceLeftLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(E, usize, E) -> E + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    self.accumulator = Some(match self.accumulator.take() {
      | Some(accumulator) => (self.reduce)(accumulator, index, input),
      | None => input,
    });
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<E>, MaterializeError> {
    Ok(self.accumulator.take())
  }
}
