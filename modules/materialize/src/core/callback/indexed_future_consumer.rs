use alloc::boxed::Box;

use crate::core::MaterializeError;

/// Indexed multi-shot consumer.
///
/// `accept` may be called repeatedly, followed by exactly one of `complete` or `error`. The size
/// hint is advisory; `None` means unknown.
pub trait IndexedFutureConsumer<P>: Send {
  /// Receives an element at `index`.
  ///
  /// # Errors
  ///
  /// Returns an error when the element cannot be processed. The producer stops and redirects that
  /// error to [`IndexedFutureConsumer::error`].
  fn accept(&mut self, size: Option<usize>, index: usize, element: P) -> Result<(), MaterializeError>;

  /// Signals that no more elements exist. `size` is the total element count of the sequence.
  ///
  /// # Errors
  ///
  /// Returns an error when completion cannot be processed; it is redirected to
  /// [`IndexedFutureConsumer::error`].
  fn complete(&mut self, size: usize) -> Result<(), MaterializeError>;

  /// Receives the failure that stopped materialization.
  fn error(&mut self, error: MaterializeError);
}

/// Boxed indexed consumer.
pub type BoxIndexedFutureConsumer<P> = Box<dyn IndexedFutureConsumer<P>>;
