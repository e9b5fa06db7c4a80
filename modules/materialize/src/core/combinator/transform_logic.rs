use alloc::{collections::VecDeque, vec::Vec};

use super::LogicFlow;
use crate::core::MaterializeError;

/// Per-element logic of a buffering combinator driven by
/// [`TransformState`](super::TransformState).
///
/// The driver pulls one upstream element at a time and hands it to [`TransformLogic::apply`];
/// whatever the logic pushes to `output` is delivered downstream in order.
pub trait TransformLogic<In, Out>: Send + 'static {
  /// Receives the fully materialized secondary source before the first upstream element.
  fn prepare(&mut self, _secondary: Vec<In>) {}

  /// Processes the upstream element at `index`.
  ///
  /// # Errors
  ///
  /// Returns an error to fail the combinator.
  fn apply(&mut self, index: usize, input: In, output: &mut VecDeque<Out>) -> Result<LogicFlow, MaterializeError>;

  /// Called once the upstream is exhausted.
  ///
  /// # Errors
  ///
  /// Returns an error to fail the combinator.
  fn on_upstream_complete(&mut self, _output: &mut VecDeque<Out>) -> Result<(), MaterializeError> {
    Ok(())
  }

  /// Number of output elements still to come, excluding already buffered output, given the
  /// remaining upstream size.
  fn remaining(&self, _upstream: Option<usize>) -> Option<usize> {
    None
  }
}
