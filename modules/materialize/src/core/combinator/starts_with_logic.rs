use alloc::vec::Vec;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

/// Answers whether the upstream begins with the secondary sequence.
pub struct StartsWithLogic<E> {
  prefix:  Vec<E>,
  matched: usize,
  holds:   bool,
}

impl<E> StartsWithLogic<E> {
  /// Creates the logic; the prefix arrives through [`AggregateLogic::prepare`].
  #[must_use]
  pub const fn new() -> Self {
    Self { prefix: Vec::new(), matched: 0, holds: true }
  }
}

impl<E> Default for StartsWithLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: PartialEq + Send + 'static> AggregateLogic<E, bool> for StartsWithLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    self.prefix = secondary;
  }

  fn is_settled(&self) -> bool {
    self.prefix.is_empty()
  }

  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if self.prefix.get(self.matched) != Some(&input) {
      self.holds = false;
      return Ok(LogicFlow::Stop);
    }
    self.matched += 1;
    if self.matched == self.prefix.len() {
      return Ok(LogicFlow::Stop);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<bool>, MaterializeError> {
    Ok(Some(self.holds && self.matched == self.prefix.len()))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
