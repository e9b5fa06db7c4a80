use alloc::{collections::VecDeque, vec::Vec};

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;


/// Answers whether the upstream ends with the secondary sequence.
///
/// Only a window as long as the suffix is retained while the upstream streams by.
pub struct EndsWithLogic<E> {
  suffix: Vec<E>,
  window: VecDeque<E>,
}

impl<E> EndsWithLogic<E> {
  /// Creates the logic; the suffix arrives through [`AggregateLogic::prepare`].
  #[must_use]
  pub const fn new() -> Self {
    Self { suffix: Vec::new(), window: VecDeque::new() }
  }
}

impl<E> Default for EndsWithLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: PartialEq + Send + 'static> AggregateLogic<E, bool> for EndsWithLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    self.window = VecDeque::with_capacity(secondary.len());
    self.suffix = secondary;
  }

  fn is_settled(&self) -> bool {
    self.suffix.is_empty()
  }

  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if self.window.len() == self.suffix.len() {
      self.window.pop_front();
    }
    self.window.push_back(input);
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<bool>, MaterializeError> {
    Ok(Some(self.window.len() == self.suffix.len() && self.window.iter().eq(self.suffix.iter())))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
