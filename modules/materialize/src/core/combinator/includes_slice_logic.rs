use alloc::vec::Vec;

use super::{AggregateLogic, LogicFlow, slice_matcher::SliceMatcher};
use crate::core::MaterializeError;

/// Answers whether the secondary sequence occurs contiguously in the upstream.
pub struct IncludesSliceLogic<E> {
  matcher: SliceMatcher<E>,
  found:   bool,
}

impl<E: PartialEq> IncludesSliceLogic<E> {
  /// Creates the logic; the needle arrives through [`AggregateLogic::prepare`].
  #[must_use]
  pub const fn new() -> Self {
    Self { matcher: SliceMatcher::new(), found: false }
  }
}

impl<E: PartialEq> Default for IncludesSliceLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: PartialEq + Send + 'static> AggregateLogic<E, bool> for IncludesSliceLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    self.found = secondary.is_empty();
    self.matcher.set_needle(secondary);
  }

  fn is_settled(&self) -> bool {
    self.found
  }

  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    if self.matcher.push(input).is_some() {
      self.found = true;
      return Ok(LogicFlow::Stop);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<bool>, MaterializeError> {
    Ok(Some(self.found))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
