use alloc::sync::Arc;

use portable_atomic::{AtomicUsize, Ordering};
use spin::Mutex;

use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, FnFutureConsumer},
};

/// Records the outcome delivered to a single-shot consumer.
pub struct ResultProbe<P> {
  slot:  Arc<Mutex<Option<Result<P, MaterializeError>>>>,
  calls: Arc<AtomicUsize>,
}

impl<P> Clone for ResultProbe<P> {
  fn clone(&self) -> Self {
    Self { slot: self.slot.clone(), calls: self.calls.clone() }
  }
}

impl<P: Send + 'static> ResultProbe<P> {
  /// Creates an empty probe.
  #[must_use]
  pub fn new() -> Self {
    Self { slot: Arc::new(Mutex::new(None)), calls: Arc::new(AtomicUsize::new(0)) }
  }

  /// Returns a consumer recording into this probe.
  #[must_use]
  pub fn consumer(&self) -> BoxFutureConsumer<P> {
    let slot = self.slot.clone();
    let calls = self.calls.clone();
    FnFutureConsumer::boxed(move |result| {
      calls.fetch_add(1, Ordering::AcqRel);
      *slot.lock() = Some(result);
      Ok(())
    })
  }

  /// Returns a consumer recording into this probe whose `accept` then fails with `error`.
  #[must_use]
  pub fn failing_consumer(&self, error: MaterializeError) -> BoxFutureConsumer<P> {
    let slot = self.slot.clone();
    let calls = self.calls.clone();
    FnFutureConsumer::boxed(move |result: Result<P, MaterializeError>| {
      calls.fetch_add(1, Ordering::AcqRel);
      let accepted = result.is_ok();
      *slot.lock() = Some(result);
      if accepted { Err(error.clone()) } else { Ok(()) }
    })
  }

  /// Takes the recorded outcome, if any.
  #[must_use]
  pub fn take(&self) -> Option<Result<P, MaterializeError>> {
    self.slot.lock().take()
  }

  /// Returns `true` once an outcome has been recorded and not yet taken.
  #[must_use]
  pub fn is_resolved(&self) -> bool {
    self.slot.lock().is_some()
  }

  /// Returns how many times the consumer was invoked in total.
  #[must_use]
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::Acquire)
  }
}

impl<P: Send + 'static> Default for ResultProbe<P> {
  fn default() -> Self {
    Self::new()
  }
}
