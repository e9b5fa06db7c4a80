use alloc::boxed::Box;

use crate::core::MaterializeError;

/// Single-shot consumer: receives exactly one value or one error.
pub trait FutureConsumer<P>: Send {
  /// Receives the materialized value.
  ///
  /// # Errors
  ///
  /// Returns an error when the value cannot be processed. The producer redirects that error to
  /// [`FutureConsumer::error`] on the same consumer.
  fn accept(&mut self, value: P) -> Result<(), MaterializeError>;

  /// Receives the failure that prevented materialization.
  fn error(&mut self, error: MaterializeError);
}

/// Boxed single-shot consumer.
pub type BoxFutureConsumer<P> = Box<dyn FutureConsumer<P>>;
