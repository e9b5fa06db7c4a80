use alloc::{collections::VecDeque, vec::Vec};

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;

/// Emits the upstream in reverse order once it completes.
pub struct ReverseLogic<E> {
  buffer: Vec<E>,
}

impl<E> ReverseLogic<E> {
  /// Creates the logic.
  #[must_use]
  pub const fn new() -> Self {
    Self { buffer: Vec::new() }
  }
}

impl<E> Default for ReverseLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Send + 'static> TransformLogic<E, E> for ReverseLogic<E> {
  fn apply(&mut self, _index: usize, input: E, _output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    self.buffer.push(input);
    Ok(LogicFlow::Continue)
  }

  fn on_upstream_complete(&mut self, output: &mut VecDeque<E>) -> Result<(), MaterializeError> {
    output.extend(self.buffer.drain(..).rev());
    Ok(())
  }

  fn remaining(&self, upstream: Option<usize>) -> Option<usize> {
    upstream.map(|remaining| remaining.saturating_add(self.buffer.len()))
  }
}
