use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
  iterator::{
    ImmaterialState, StatefulIteratorMaterializer, freeze_gate::FreezeGate, pending_request::PendingRequest,
  },
};

struct ParkedInner<E> {
  gate:          FreezeGate<E>,
  known_size:    Option<usize>,
  cancellations: Mutex<Vec<MaterializeError>>,
}

/// Immaterial state that answers nothing until its machine is frozen from the outside.
///
/// Stands in for an upstream whose data has not arrived yet. Every request is parked; after the
/// test transitions the machine, [`ParkedState::release`] replays the parked requests against the
/// frozen state. Cancellations are recorded and cancel the machine.
pub struct ParkedState<E> {
  inner: Arc<ParkedInner<E>>,
}

impl<E> Clone for ParkedState<E> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<E: Clone + Send + 'static> ParkedState<E> {
  /// Creates a state reporting an unknown size.
  #[must_use]
  pub fn new() -> Self {
    Self::with_known_size(None)
  }

  /// Creates a state reporting `known_size`.
  #[must_use]
  pub fn with_known_size(known_size: Option<usize>) -> Self {
    Self {
      inner: Arc::new(ParkedInner { gate: FreezeGate::new(), known_size, cancellations: Mutex::new(Vec::new()) }),
    }
  }

  /// Returns the number of parked requests.
  #[must_use]
  pub fn pending(&self) -> usize {
    self.inner.gate.pending()
  }

  /// Returns every cancellation received so far.
  #[must_use]
  pub fn cancellations(&self) -> Vec<MaterializeError> {
    self.inner.cancellations.lock().clone()
  }

  /// Replays the parked requests once `machine` is frozen.
  pub fn release(&self, machine: &StatefulIteratorMaterializer<E>) {
    self.inner.gate.release(machine);
  }

  fn park(&self, machine: &StatefulIteratorMaterializer<E>, request: PendingRequest<E>) {
    // starting is a no-op: the test drives the transition
    let _ = self.inner.gate.submit(machine, request);
  }
}

impl<E: Clone + Send + 'static> Default for ParkedState<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Clone + Send + Sync + 'static> ImmaterialState<E> for ParkedState<E> {
  fn known_size(&self) -> Option<usize> {
    self.inner.known_size
  }

  fn is_materialized_at_once(&self) -> bool {
    false
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError) {
    self.inner.cancellations.lock().push(error.clone());
    machine.set_cancelled(error);
    self.release(machine);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<Vec<E>>,
  ) {
    self.park(machine, PendingRequest::elements(consumer));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    self.park(machine, PendingRequest::HasNext(consumer));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxIndexedFutureConsumer<E>,
  ) {
    self.park(machine, PendingRequest::Next(consumer));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    predicate: BoxIndexedFuturePredicate<E>,
  ) {
    self.park(machine, PendingRequest::NextWhile(predicate));
  }

  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  ) {
    self.park(machine, PendingRequest::skip(count, consumer));
  }

  fn weight_elements(&self) -> usize {
    1
  }

  fn weight_has_next(&self) -> usize {
    1
  }

  fn weight_next(&self) -> usize {
    1
  }

  fn weight_next_while(&self) -> usize {
    1
  }

  fn weight_skip(&self) -> usize {
    1
  }
}
