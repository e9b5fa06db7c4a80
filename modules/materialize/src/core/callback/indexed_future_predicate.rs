use alloc::boxed::Box;

use crate::core::MaterializeError;

/// Indexed multi-shot predicate.
///
/// Returning `false` from [`IndexedFuturePredicate::test`] asks the producer to stop; no further
/// call is made on the predicate in that case. Otherwise the sequence ends with exactly one
/// `complete` or `error`.
pub trait IndexedFuturePredicate<P>: Send {
  /// Tests the element at `index`, returning whether more elements are wanted.
  ///
  /// # Errors
  ///
  /// Returns an error when the element cannot be processed. The producer stops and redirects that
  /// error to [`IndexedFuturePredicate::error`].
  fn test(&mut self, size: Option<usize>, index: usize, element: P) -> Result<bool, MaterializeError>;

  /// Signals that no more elements exist. `size` is the total element count of the sequence.
  ///
  /// # Errors
  ///
  /// Returns an error when completion cannot be processed; it is redirected to
  /// [`IndexedFuturePredicate::error`].
  fn complete(&mut self, size: usize) -> Result<(), MaterializeError>;

  /// Receives the failure that stopped materialization.
  fn error(&mut self, error: MaterializeError);
}

/// Boxed indexed predicate.
pub type BoxIndexedFuturePredicate<P> = Box<dyn IndexedFuturePredicate<P>>;
