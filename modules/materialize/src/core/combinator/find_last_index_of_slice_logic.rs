use alloc::vec::Vec;

use super::{AggregateLogic, LogicFlow, slice_matcher::SliceMatcher};
use crate::core::MaterializeError;

#[cfg(test)]
mod tests;

/// Finds the start index of the last occurrence of the secondary sequence.
///
/// An empty needle is found at the end of the upstream, that is at its element count.
pub struct FindLastIndexOfSliceLogic<E> {
  matcher: SliceMatcher<E>,
  found:   Option<usize>,
}

impl<E: PartialEq> FindLastIndexOfSliceLogic<E> {
  /// Creates the logic; the needle arrives through [`AggregateLogic::prepare`].
  #[must_use]
  pub const fn new() -> Self {
    Self { matcher: SliceMatcher::new(), found: None }
  }
}

impl<E: PartialEq> Default for FindLastIndexOfSliceLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: PartialEq + Send + 'static> AggregateLogic<E, usize> for FindLastIndexOfSliceLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    self.matcher.set_needle(secondary);
  }

  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if let Some(start) = self.matcher.push(input) {
      self.found = Some(start);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<usize>, MaterializeError> {
    if self.matcher.is_needle_empty() {
      return Ok(Some(self.matcher.consumed()));
    }
    Ok(self.found)
  }
}
