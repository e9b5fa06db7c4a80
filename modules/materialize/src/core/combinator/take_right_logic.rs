use alloc::collections::VecDeque;

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;

/// Keeps only the last `count` elements.
pub struct TakeRightLogic<E> {
  count:  usize,
  window: VecDeque<E>,
}

impl<E> TakeRightLogic<E> {
  /// Creates the logic.
  #[must_use]
  pub const fn new(count: usize) -> Self {
    Self { count, window: VecDeque::new() }
  }
}

impl<E: Send + 'static> TransformLogic<E, E> for TakeRightLogic<E> {
  fn apply(&mut self, _index: usize, input: E, _output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    if self.count == 0 {
      return Ok(LogicFlow::Stop);
    }
    if self.window.len() == self.count {
      self.window.pop_front();
    }
    self.window.push_back(input);
    Ok(LogicFlow::Continue)
  }

  fn on_upstream_complete(&mut self, output: &mut VecDeque<E>) -> Result<(), MaterializeError> {
    output.append(&mut self.window);
    Ok(())
  }

  fn remaining(&self, upstream: Option<usize>) -> Option<usize> {
    upstream.map(|remaining| remaining.saturating_add(self.window.len()).min(self.count))
  }
}
