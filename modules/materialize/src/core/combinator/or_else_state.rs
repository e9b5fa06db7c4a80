use alloc::{boxed::Box, sync::Arc, vec::Vec};

use crate::core::{
  MaterializeError, saturating_weight_add,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer},
  iterator::{
    ImmaterialState, SharedIteratorMaterializer, StatefulIteratorMaterializer, freeze_gate::FreezeGate,
    pending_request::PendingRequest,
  },
};


/// Yields the upstream, or the alternative when the upstream turns out to be empty.
pub struct OrElseState<E> {
  upstream:    SharedIteratorMaterializer<E>,
  alternative: SharedIteratorMaterializer<E>,
  gate:        FreezeGate<E>,
}

impl<E: Clone + Send + Sync + 'static> OrElseState<E> {
  /// Creates the combinator.
  #[must_use]
  pub const fn new(upstream: SharedIteratorMaterializer<E>, alternative: SharedIteratorMaterializer<E>) -> Self {
    Self { upstream, alternative, gate: FreezeGate::new() }
  }

  fn submit(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, request: PendingRequest<E>) {
    if self.gate.submit(machine, request) {
      let upstream = self.upstream.clone();
      upstream.materialize_has_next(Box::new(OrElseProbe { state: self, machine: machine.clone() }));
    }
  }

  fn weight(&self, operation: usize) -> usize {
    saturating_weight_add(self.upstream.weight_has_next(), operation)
  }
}

struct OrElseProbe<E> {
  state:   Arc<OrElseState<E>>,
  machine: StatefulIteratorMaterializer<E>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<bool> for OrElseProbe<E> {
  fn accept(&mut self, has_next: bool) -> Result<(), MaterializeError> {
    let chosen = if has_next { self.state.upstream.clone() } else { self.state.alternative.clone() };
    let _ = self.machine.freeze(chosen);
    self.state.gate.release(&self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.machine.set_failed(error);
    self.state.gate.release(&self.machine);
  }
}

impl<E: Clone + Send + Sync + 'static> ImmaterialState<E> for OrElseState<E> {
  fn known_size(&self) -> Option<usize> {
    match self.upstream.known_size() {
      | Some(0) => self.alternative.known_size(),
      | size => size,
    }
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once() && self.alternative.is_materialized_at_once()
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    self.alternative.materialize_cancel(error.clone());
    machine.set_cancelled(error);
    self.gate.release(machine);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<Vec<E>>,
  ) {
    self.submit(machine, PendingRequest::elements(consumer));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    self.submit(machine, PendingRequest::HasNext(consumer));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxIndexedFutureConsumer<E>,
  ) {
    self.submit(machine, PendingRequest::Next(consumer));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    predicate: BoxIndexedFuturePredicate<E>,
  ) {
    self.submit(machine, PendingRequest::NextWhile(predicate));
  }

  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  ) {
    self.submit(machine, PendingRequest::skip(count, consumer));
  }

  fn weight_cancel(&self) -> usize {
    saturating_weight_add(self.upstream.weight_cancel(), self.alternative.weight_cancel())
  }

  fn weight_elements(&self) -> usize {
    self.weight(self.upstream.weight_elements().max(self.alternative.weight_elements()))
  }

  fn weight_has_next(&self) -> usize {
    self.weight(self.upstream.weight_has_next().max(self.alternative.weight_has_next()))
  }

  fn weight_next(&self) -> usize {
    self.weight(self.upstream.weight_next().max(self.alternative.weight_next()))
  }

  fn weight_next_while(&self) -> usize {
    self.weight(self.upstream.weight_next_while().max(self.alternative.weight_next_while()))
  }

  fn weight_skip(&self) -> usize {
    self.weight(self.upstream.weight_skip().max(self.alternative.weight_skip()))
  }
}
