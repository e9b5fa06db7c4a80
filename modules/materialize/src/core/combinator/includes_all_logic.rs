use alloc::vec::Vec;
use core::hash::Hash;

use ahash::RandomState;
use hashbrown::HashSet;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

#[cfg(test)]
mod tests;

/// Answers whether every element of the secondary source occurs in the upstream, in any order.
pub struct IncludesAllLogic<E> {
  missing: HashSet<E, RandomState>,
}

impl<E> IncludesAllLogic<E> {
  /// Creates the logic; the required elements arrive through [`AggregateLogic::prepare`].
  #[must_use]
  pub fn new() -> Self {
    Self { missing: HashSet::with_hasher(RandomState::new()) }
  }
}

impl<E> Default for IncludesAllLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Eq + Hash + Send + 'static> AggregateLogic<E, bool> for IncludesAllLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    self.missing.extend(secondary);
  }

  fn is_settled(&self) -> bool {
    self.missing.is_empty()
  }

  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    self.missing.remove(&input);
    if self.missing.is_empty() {
      return Ok(LogicFlow::Stop);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<bool>, MaterializeError> {
    Ok(Some(self.missing.is_empty()))
  }

  fn result_size(&self) -> Option<usize> {
    Some(1)
  }
}
