use alloc::vec::Vec;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;


/// Folds the elements from the last to the first.
///
/// The traversal order is reversed, so every upstream element is buffered before the first fold
/// step runs.
pub struct FoldRightLogic<E, A, F> {
  accumulator: Option<A>,
  fold:        F,
  buffer:      Vec<(usize, E)>,
}

impl<E, A, F> FoldRightLogic<E, A, F> {
  /// Creates the logic starting from `initial`.
  #[must_use]
  pub const fn new(initial: A, fold: F) -> Self {
    Self { accumulator: Some(initial), fold, buffer: Vec::new() }
  }
}

impl<E, A, F> AggregateLogic<E, A> for FoldRightLogic<E, A, F>
where
  E: Send + 'static,
  A: Send + 'static,
  F: FnMut(usize, E, A) -> A + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    self.buffer.push((index, input));
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<A>, MaterializeError> {
    let mut accumulator = self.accumulator.take().ok_or(MaterializeError::NoSuchElement)?;
    while let Some((index, element)) = self.buffer.pop() {
      accumulator = (self.fold)(index, element, accumulator);
    }
    Ok(Some(accumulator))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
