use alloc::collections::VecDeque;
use core::hash::Hash;

use ahash::RandomState;
use hashbrown::HashSet;

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;

#[cfg(test)]
mod tests;

/// Suppresses elements whose derived key was already seen.
pub struct DistinctByLogic<K, F> {
  key:  F,
  seen: HashSet<K, RandomState>,
}

impl<K, F> DistinctByLogic<K, F> {
  /// Creates the logic.
  #[must_use]
  pub fn new(key: F) -> Self {
    Self { key, seen: HashSet::with_hasher(RandomState::new()) }
  }
}

impl<E, K, F> TransformLogic<E, E> for DistinctByLogic<K, F>
where
  E: Send + 'static,
  K: Eq + Hash + Send + 'static,
  F: FnMut(&E) -> K + Send + 'static,
{
  fn apply(&mut self, _index: usize, input: E, output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    if self.seen.insert((self.key)(&input)) {
      output.push_back(input);
    }
    Ok(LogicFlow::Continue)
  }

  fn remaining(&self, upstream: Option<usize>) -> Option<usize> {
    upstream.filter(|remaining| *remaining == 0)
  }
}
