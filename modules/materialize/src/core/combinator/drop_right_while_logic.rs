use alloc::{collections::VecDeque, vec::Vec};

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;


/// Drops the longest suffix whose elements all match the predicate.
///
/// The whole upstream is buffered; the predicate is evaluated from the tail once the upstream
/// completes.
pub struct DropRightWhileLogic<E, F> {
  predicate: F,
  buffer:    Vec<(usize, E)>,
}

impl<E, F> DropRightWhileLogic<E, F> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(predicate: F) -> Self {
    Self { predicate, buffer: Vec::new() }
  }
}

impl<E, F> TransformLogic<E, E> for DropRightWhileLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn apply(&mut self, index: usize, input: E, _output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    self.buffer.push((index, input));
    Ok(LogicFlow::Continue)
  }

  fn on_upstream_complete(&mut self, output: &mut VecDeque<E>) -> Result<(), MaterializeError> {
    let predicate = &mut self.predicate;
    let keep = self.buffer.iter().rposition(|(index, element)| !predicate(*index, element)).map_or(0, |last| last + 1);
    self.buffer.truncate(keep);
    output.extend(self.buffer.drain(..).map(|(_, element)| element));
    Ok(())
  }
}
