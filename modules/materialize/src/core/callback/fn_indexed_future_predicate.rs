use alloc::boxed::Box;

use super::{BoxIndexedFuturePredicate, IndexedEvent, IndexedFuturePredicate};
use crate::core::MaterializeError;

/// Indexed predicate backed by a closure receiving [`IndexedEvent`] values.
///
/// The closure's boolean is only consulted for [`IndexedEvent::Next`].
pub struct FnIndexedFuturePredicate<F> {
  handler: F,
}

impl<F> FnIndexedFuturePredicate<F> {
  /// Wraps the closure.
  #[must_use]
  pub const fn new(handler: F) -> Self {
    Self { handler }
  }

  /// Wraps the closure and boxes it.
  #[must_use]
  pub fn boxed<P>(handler: F) -> BoxIndexedFuturePredicate<P>
  where
    F: FnMut(IndexedEvent<P>) -> Result<bool, MaterializeError> + Send + 'static,
    P: 'static, {
    Box::new(Self::new(handler))
  }
}

impl<P, F> IndexedFuturePredicate<P> for FnIndexedFuturePredicate<F>
where
  F: FnMut(IndexedEvent<P>) -> Result<bool, MaterializeError> + Send,
{
  fn test(&mut self, size: Option<usize>, index: usize, element: P) -> Result<bool, MaterializeError> {
    (self.handler)(IndexedEvent::Next { size, index, element })
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    (self.handler)(IndexedEvent::Complete { size }).map(|_| ())
  }

  fn error(&mut self, error: MaterializeError) {
    let _ = (self.handler)(IndexedEvent::Error(error));
  }
}
