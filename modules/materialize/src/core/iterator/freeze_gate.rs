use spin::Mutex;

use super::{
  StatefulIteratorMaterializer,
  pending_request::{PendingRequest, PendingRequests, replay_all},
};

#[cfg(test)]
mod tests;

struct GateInner<E> {
  requests: PendingRequests<E>,
  started:  bool,
}

/// Waiter list of a combinator that settles with a single upstream exchange.
///
/// The first submitted request starts the exchange; every request waits until the machine
/// freezes and is then replayed, in registration order, against the frozen state.
pub(crate) struct FreezeGate<E> {
  inner: Mutex<GateInner<E>>,
}

impl<E: Clone + Send + 'static> FreezeGate<E> {
  pub(crate) const fn new() -> Self {
    Self { inner: Mutex::new(GateInner { requests: PendingRequests::new(), started: false }) }
  }

  /// Queues `request`; returns `true` exactly once, for the caller that must start the exchange.
  pub(crate) fn submit(&self, machine: &StatefulIteratorMaterializer<E>, request: PendingRequest<E>) -> bool {
    let start = {
      let mut inner = self.inner.lock();
      inner.requests.push(request);
      !core::mem::replace(&mut inner.started, true)
    };
    if machine.is_frozen() {
      // the transition may have released before this request was queued
      self.release(machine);
      return false;
    }
    start
  }

  /// Replays every queued request against the frozen state. Does nothing while running.
  pub(crate) fn release(&self, machine: &StatefulIteratorMaterializer<E>) {
    if let Some(state) = machine.frozen_state() {
      let requests = self.inner.lock().requests.take_all();
      replay_all(requests, &*state);
    }
  }

  pub(crate) fn pending(&self) -> usize {
    self.inner.lock().requests.len()
  }
}
