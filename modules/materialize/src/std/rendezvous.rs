extern crate std;

use alloc::sync::Arc;
#[allow(clippy::disallowed_types)]
use std::sync::{Condvar, Mutex, PoisonError};

use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, FnFutureConsumer},
};

#[cfg(test)]
mod tests;

struct Slot<P> {
  value: Mutex<Option<Result<P, MaterializeError>>>,
  ready: Condvar,
}

/// One-shot handoff from a callback thread to a blocked waiter.
pub(crate) struct Rendezvous<P> {
  slot: Arc<Slot<P>>,
}

impl<P: Send + 'static> Rendezvous<P> {
  pub(crate) fn new() -> Self {
    Self { slot: Arc::new(Slot { value: Mutex::new(None), ready: Condvar::new() }) }
  }

  /// Returns a consumer publishing its outcome to [`Rendezvous::wait`].
  pub(crate) fn consumer(&self) -> BoxFutureConsumer<P> {
    let slot = self.slot.clone();
    FnFutureConsumer::boxed(move |result| {
      slot.publish(result);
      Ok(())
    })
  }

  /// Publishes an outcome directly.
  pub(crate) fn publish(&self, result: Result<P, MaterializeError>) {
    self.slot.publish(result);
  }

  /// Blocks until an outcome was published.
  pub(crate) fn wait(self) -> Result<P, MaterializeError> {
    let mut value = self.slot.value.lock().unwrap_or_else(PoisonError::into_inner);
    loop {
      if let Some(result) = value.take() {
        return result;
      }
      value = self.slot.ready.wait(value).unwrap_or_else(PoisonError::into_inner);
    }
  }
}

impl<P> Slot<P> {
  fn publish(&self, result: Result<P, MaterializeError>) {
    let mut value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
    // first outcome wins
    if value.is_none() {
      *value = Some(result);
      self.ready.notify_all();
    }
  }
}

impl<P> Clone for Rendezvous<P> {
  fn clone(&self) -> Self {
    Self { slot: self.slot.clone() }
  }
}
