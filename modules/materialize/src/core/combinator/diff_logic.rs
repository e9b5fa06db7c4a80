use alloc::{collections::VecDeque, vec::Vec};
use core::hash::Hash;

use ahash::RandomState;
use hashbrown::HashMap;

use super::{LogicFlow, TransformLogic};
use crate::core::MaterializeError;

#[cfg(test)]
mod tests;

/// Multiset subtraction of the secondary source from the upstream.
///
/// The secondary source is counted into a bag; each upstream element is emitted unless the bag
/// still holds a positive count for it, in which case that count is decremented.
pub struct DiffLogic<E> {
  bag: HashMap<E, usize, RandomState>,
}

impl<E> DiffLogic<E> {
  /// Creates the logic with an empty bag.
  #[must_use]
  pub fn new() -> Self {
    Self { bag: HashMap::with_hasher(RandomState::new()) }
  }
}

impl<E> Default for DiffLogic<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Eq + Hash + Send + 'static> TransformLogic<E, E> for DiffLogic<E> {
  fn prepare(&mut self, secondary: Vec<E>) {
    for element in secondary {
      *self.bag.entry(element).or_insert(0) += 1;
    }
  }

  fn apply(&mut self, _index: usize, input: E, output: &mut VecDeque<E>) -> Result<LogicFlow, MaterializeError> {
    match self.bag.get_mut(&input) {
      | Some(count) => {
        *count -= 1;
        if *count == 0 {
          self.bag.remove(&input);
        }
      },
      | None => output.push_back(input),
    }
    Ok(LogicFlow::Continue)
  }

  fn remaining(&self, upstream: Option<usize>) -> Option<usize> {
    if self.bag.is_empty() { upstream } else { upstream.filter(|remaining| *remaining == 0) }
  }
}
