use alloc::boxed::Box;

use super::{BoxIndexedFutureConsumer, IndexedEvent, IndexedFutureConsumer};
use crate::core::MaterializeError;

/// Indexed consumer backed by a closure receiving [`IndexedEvent`] values.
pub struct FnIndexedFutureConsumer<F> {
  handler: F,
}

impl<F> FnIndexedFutureConsumer<F> {
  /// Wraps the closure.
  #[must_use]
  pub const fn new(handler: F) -> Self {
    Self { handler }
  }

  /// Wraps the closure and boxes it.
  #[must_use]
  pub fn boxed<P>(handler: F) -> BoxIndexedFutureConsumer<P>
  where
    F: FnMut(IndexedEvent<P>) -> Result<(), MaterializeError> + Send + 'static,
    P: 'static, {
    Box::new(Self::new(handler))
  }
}

impl<P, F> IndexedFutureConsumer<P> for FnIndexedFutureConsumer<F>
where
  F: FnMut(IndexedEvent<P>) -> Result<(), MaterializeError> + Send,
{
  fn accept(&mut self, size: Option<usize>, index: usize, element: P) -> Result<(), MaterializeError> {
    (self.handler)(IndexedEvent::Next { size, index, element })
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    (self.handler)(IndexedEvent::Complete { size })
  }

  fn error(&mut self, error: MaterializeError) {
    let _ = (self.handler)(IndexedEvent::Error(error));
  }
}
