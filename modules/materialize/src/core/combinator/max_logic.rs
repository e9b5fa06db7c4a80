use core::cmp::Ordering;

use super::{AggregateLogic, LogicFlow};
use crate::core::MaterializeError;

#[cfg(test)]
mod tests;

/// Keeps the greatest element according to a comparator; the first of several equal maxima wins.
///
/// [`MaxLogic::min`] flips the comparison to keep the least element instead. An empty upstream
/// realizes an empty result.
pub struct MaxLogic<E, F> {
  compare: F,
  wanted:  Ordering,
  best:    Option<E>,
}

impl<E, F> MaxLogic<E, F>
where
  F: FnMut(&E, &E) -> Ordering,
{
  /// Creates a logic keeping the greatest element.
  #[must_use]
  pub const fn new(compare: F) -> Self {
    Self { compare, wanted: Ordering::Greater, best: None }
  }

  /// Creates a logic keeping the least element.
  #[must_use]
  pub const fn min(compare: F) -> Self {
    Self { compare, wanted: Ordering::Less, best: None }
  }
}

impl<E, F> AggregateLogic<E, E> for MaxLogic<E, F>
where
  E: Send + 'static,
  F: FnMut(&E, &E) -> Ordering + Send + 'static,
{
  fn apply(&mut self, _index: usize, input: E) -> Result<LogicFlow, MaterializeError> {
    let replace = match &self.best {
      | Some(best) => (self.compare)(&input, best) == self.wanted,
      | None => true,
    };
    if replace {
      self.best = Some(input);
    }
    Ok(LogicFlow::Continue)
  }

  fn finish(&mut self) -> Result<Option<E>, MaterializeError> {
    Ok(self.best.take())
  }
}
