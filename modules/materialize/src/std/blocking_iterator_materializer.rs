use alloc::vec::Vec;

use super::rendezvous::Rendezvous;
use crate::core::{
  LOG_TARGET, MaterializeError,
  callback::{FnIndexedFutureConsumer, IndexedEvent},
  context::SharedExecutionContext,
  iterator::SharedIteratorMaterializer,
};

#[cfg(test)]
mod tests;

/// Blocking view of a materializer for synchronous callers.
///
/// Each call issues the corresponding `materialize_*` request and parks the calling thread until
/// the callback fires. When the materializer is driven by an execution context, calls made from
/// that context's own tasks fail with [`MaterializeError::Deadlock`] instead of parking the thread
/// that would have to resume them.
///
/// As an [`Iterator`] it yields `Ok` elements until the sequence completes and stops after the
/// first `Err`.
pub struct BlockingIteratorMaterializer<E> {
  upstream: SharedIteratorMaterializer<E>,
  context:  Option<SharedExecutionContext>,
  fused:    bool,
}

impl<E: Send + 'static> BlockingIteratorMaterializer<E> {
  /// Wraps a materializer that answers on the caller's thread or on threads it owns.
  #[must_use]
  pub const fn new(upstream: SharedIteratorMaterializer<E>) -> Self {
    Self { upstream, context: None, fused: false }
  }

  /// Wraps a materializer whose callbacks are delivered by tasks of `context`.
  #[must_use]
  pub const fn with_context(upstream: SharedIteratorMaterializer<E>, context: SharedExecutionContext) -> Self {
    Self { upstream, context: Some(context), fused: false }
  }

  fn ensure_blockable(&self) -> Result<(), MaterializeError> {
    match &self.context {
      | Some(context) if context.is_current() => {
        tracing::warn!(target: LOG_TARGET, "blocking call from a task of the driving context");
        Err(MaterializeError::Deadlock)
      },
      | _ => Ok(()),
    }
  }

  /// Blocks until the next element is available.
  ///
  /// Returns `Ok(None)` once the sequence is complete.
  ///
  /// # Errors
  ///
  /// Returns the materialization failure, or [`MaterializeError::Deadlock`] when called from a
  /// task of the driving context.
  pub fn next_element(&self) -> Result<Option<E>, MaterializeError> {
    self.ensure_blockable()?;
    let rendezvous = Rendezvous::new();
    let sink = rendezvous.clone();
    self.upstream.materialize_next(FnIndexedFutureConsumer::boxed(move |event| {
      sink.publish(match event {
        | IndexedEvent::Next { element, .. } => Ok(Some(element)),
        | IndexedEvent::Complete { .. } => Ok(None),
        | IndexedEvent::Error(error) => Err(error),
      });
      Ok(())
    }));
    rendezvous.wait()
  }

  /// Blocks until it is known whether another element exists.
  ///
  /// # Errors
  ///
  /// Returns the materialization failure, or [`MaterializeError::Deadlock`] when called from a
  /// task of the driving context.
  pub fn has_next(&self) -> Result<bool, MaterializeError> {
    self.ensure_blockable()?;
    let rendezvous = Rendezvous::new();
    self.upstream.materialize_has_next(rendezvous.consumer());
    rendezvous.wait()
  }

  /// Blocks until every remaining element is available.
  ///
  /// # Errors
  ///
  /// Returns the materialization failure, or [`MaterializeError::Deadlock`] when called from a
  /// task of the driving context.
  pub fn elements(&self) -> Result<Vec<E>, MaterializeError> {
    self.ensure_blockable()?;
    let rendezvous = Rendezvous::new();
    self.upstream.materialize_elements(rendezvous.consumer());
    rendezvous.wait()
  }

  /// Blocks until up to `count` elements were skipped, returning how many were.
  ///
  /// # Errors
  ///
  /// Returns the materialization failure, or [`MaterializeError::Deadlock`] when called from a
  /// task of the driving context.
  pub fn skip_elements(&self, count: usize) -> Result<usize, MaterializeError> {
    self.ensure_blockable()?;
    let rendezvous = Rendezvous::new();
    self.upstream.materialize_skip(count, rendezvous.consumer());
    rendezvous.wait()
  }

  /// Cancels the underlying materializer.
  pub fn cancel(&self, error: MaterializeError) {
    self.upstream.materialize_cancel(error);
  }
}

impl<E: Send + 'static> Iterator for BlockingIteratorMaterializer<E> {
  type Item = Result<E, MaterializeError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.fused {
      return None;
    }
    match self.next_element() {
      | Ok(Some(element)) => Some(Ok(element)),
      | Ok(None) => {
        self.fused = true;
        None
      },
      | Err(error) => {
        self.fused = true;
        Some(Err(error))
      },
    }
  }
}
