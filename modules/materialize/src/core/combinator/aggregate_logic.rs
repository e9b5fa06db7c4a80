use alloc::vec::Vec;

use super::LogicFlow;
use crate::core::MaterializeError;

/// Single-pass accumulation driven by [`AggregateState`](super::AggregateState).
///
/// The driver feeds every upstream element through one `materialize_next_while` pass and then
/// realizes the result of [`AggregateLogic::finish`] as a one-element sequence, or as an empty
/// one for `None`.
pub trait AggregateLogic<In, R>: Send + 'static {
  /// Receives the fully materialized secondary source before the first upstream element.
  fn prepare(&mut self, _secondary: Vec<In>) {}

  /// Returns `true` when the result is decided without looking at any upstream element.
  fn is_settled(&self) -> bool {
    false
  }

  /// Accumulates the upstream element at `index`.
  ///
  /// # Errors
  ///
  /// Returns an error to fail the aggregation.
  fn apply(&mut self, index: usize, input: In) -> Result<LogicFlow, MaterializeError>;

  /// Produces the result.
  ///
  /// # Errors
  ///
  /// Returns an error to fail the aggregation.
  fn finish(&mut self) -> Result<Option<R>, MaterializeError>;

  /// Number of result elements when known in advance.
  fn result_size(&self) -> Option<usize> {
    None
  }
}
