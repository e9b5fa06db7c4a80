use core::marker::PhantomData;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Folds the elements from the first to the last.
pub struct FoldLeftLogic<E, A, F> {
  accumulator: Option<A>,
  fold:        F,
  _pd:         PhantomData<fn(E)>,
}

impl<E, A, F> FoldLeftLogic<E, A, F> {
  /// Creates the logic starting from `initial`.
  #[must_use]
  pub const fn new(initial: A, fold: F) -> Self {
    Self { accumulator: Some(initial), fold, _pd: PhantomData }
  }
}

impl<E, A, F> AggregateLogic<E, A> for FoldLeftLogic<E, A, F>
where
  E: Send + 'static,
  A: Send + 'static,
  F: FnMut(A, usize, E) -> A + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    let accumulator = self.accumulator.take().ok_or(MaterializeError::NoSuchElement)?;
    self.accumulator = Some((self.fold)(accumulator, index, input));
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<A>, MaterializeError> {
    self.accumulator.take().map(Some).ok_or(MaterializeError::NoSuchElement)
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
