use alloc::collections::VecDeque;

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;


/// Drops the last `count` elements.
///
/// Holds a lookahead window of `count` elements; the oldest one is emitted only once a newer
/// element proves it is not part of the trailing window.
pub struct DropRightLogic<E> {
  count:  usize,
  window: VecDeque<E>,
}

impl<E> DropRightLogic<E> {
  /// Creates the logic.
  #[must_use]
  pub fn new(count: usize) -> Self {
    Self { count, window: VecDeque::with_capacity(count.min(64)) }
  }
}

impl<E: Send + 'static> TransformLogic<E, E> for DropRightLogic<E> {
  fn apply(&mut self, _index: usize, input: E, output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    self.window.push_back(input);
    if self.window.len() > self.count {
      if let Some(confirmed) = self.window.pop_front() {
        output.push_back(confirmed);
      }
    }
    Ok(LogicFlow::Continue)
  }

  fn on_upstream_complete(&mut self, _output: &mut VecDeque<E>) -> Result<(), MaterializeError> {
    self.window.clear();
    Ok(())
  }

  fn remaining(&self, upstream: Option<usize>) -> Option<usize> {
    upstream.map(|remaining| remaining.saturating_add(self.window.len()).saturating_sub(self.count))
  }
}
