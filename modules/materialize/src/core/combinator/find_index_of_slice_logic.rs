use alloc::vec::Vec;

use super::{AggregateLogic, LogicFlow, slice_matcher::SliceMatcher};
use crate::core::MaterializeError;

/// Finds the start index of the first occurrence of the secondary sequence.
///
/// An empty needle is found at index `0`; no occurrence realizes an empty result.
pub struct FindIndexOfSliceLogic<E> {
  matcher: SliceMatcher<E>,
  found:   Option<usize>,
}

impl<E: PartialEq> FindIndexOfSliceLogic<E> {
  /// Creates the logic; the needle arrives through [`AggregateLogic::prepare`].
  #[must_use]
  pub const fn new() -> Self {
    Self { matcher: SliceMatcher::new(), found: None }
  }
}

impl<E: PartialEq> Default for FindIndexOfSliceLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: PartialEq + Send + 'static> AggregateLogic<E, usize> for FindIndexOfSliceLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    if secondary.is_empty() {
      self.found = Some(0);
    }
    self.matcher.set_needle(secondary);
  }

  fn is_settled(&self) -> bool {
    self.found.is_some()
  }

  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    match self.matcher.push(input) {
      | Some(start) => {
        self.found = Some(start);
        Ok(LogicFlow::Stop)
      },
      | None => Ok(LogicFlow::Continue),
    }
  }

  fn finish(&mut self) -> Result<Option<usize>, MaterializeError> {
    Ok(self.found)
  }
}
