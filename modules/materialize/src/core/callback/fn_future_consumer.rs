use alloc::boxed::Box;

use super::{BoxFutureConsumer, FutureConsumer};
use crate::core::MaterializeError;

#[cfg(test)]
mod tests;

/// Single-shot consumer backed by a closure receiving the outcome as a `Result`.
pub struct FnFutureConsumer<F> {
  handler: F,
}

impl<F> FnFutureConsumer<F> {
  /// Wraps the closure.
  #[must_use]
  pub const fn new(handler: F) -> Self {
    Self { handler }
  }

  /// Wraps the closure and boxes it.
  #[must_use]
  pub fn boxed<P>(handler: F) -> BoxFutureConsumer<P>
  where
    F: FnMut(Result<P, MaterializeError>) -> Result<(), MaterializeError> + Send + 'static,
    P: 'static, {
    Box::new(Self::new(handler))
  }
}

impl<P, F> FutureConsumer<P> for FnFutureConsumer<F>
where
  F: FnMut(Result<P, MaterializeError>) -> Result<(), MaterializeError> + Send,
{
  fn accept(&mut self, value: P) -> Result<(), MaterializeError> {
    (self.handler)(Ok(value))
  }

  fn error(&mut self, error: MaterializeError) {
    // the error path has nowhere left to report to
    let _ = (self.handler)(Err(error));
  }
}
