use alloc::{boxed::Box, sync::Arc, vec::Vec};

use crate::core::{
  MaterializeError, saturating_weight_add,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer},
  iterator::{
    ImmaterialState, SharedIteratorMaterializer, StatefulIteratorMaterializer, WrappingIteratorMaterializer,
    freeze_gate::FreezeGate, pending_request::PendingRequest,
  },
};

#[cfg(test)]
mod tests;

/// Discards the first `count` upstream elements.
///
/// The first request skips them with a single upstream call; the machine then freezes into the
/// renumbered remainder of the upstream and every waiter is replayed against it.
pub struct DropState<E> {
  upstream: SharedIteratorMaterializer<E>,
  count:    usize,
  gate:     FreezeGate<E>,
}

impl<E: Clone + Send + Sync + 'static> DropState<E> {
  /// Creates the combinator.
  #[must_use]
  pub const fn new(upstream: SharedIteratorMaterializer<E>, count: usize) -> Self {
    Self { upstream, count, gate: FreezeGate::new() }
  }

  fn submit(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, request: PendingRequest<E>) {
    if self.gate.submit(machine, request) {
      let upstream = self.upstream.clone();
      upstream.materialize_skip(self.count, Box::new(DropConsumer { state: self, machine: machine.clone() }));
    }
  }

  fn weight(&self, operation: usize) -> usize {
    saturating_weight_add(self.upstream.weight_skip(), operation)
  }
}

struct DropConsumer<E> {
  state:   Arc<DropState<E>>,
  machine: StatefulIteratorMaterializer<E>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<usize> for DropConsumer<E> {
  fn accept(&mut self, _skipped: usize) -> Result<(), MaterializeError> {
    let _ = self.machine.freeze(WrappingIteratorMaterializer::shared(self.state.upstream.clone(), 0));
    self.state.gate.release(&self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.machine.set_failed(error);
    self.state.gate.release(&self.machine);
  }
}

impl<E: Clone + Send + Sync + 'static> ImmaterialState<E> for DropState<E> {
  fn known_size(&self) -> Option<usize> {
    self.upstream.known_size().map(|size| size.saturating_sub(self.count))
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once()
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
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

  fn weight_elements(&self) -> usize {
    self.weight(self.upstream.weight_elements())
  }

  fn weight_has_next(&self) -> usize {
    self.weight(self.upstream.weight_has_next())
  }

  fn weight_next(&self) -> usize {
    self.weight(self.upstream.weight_next())
  }

  fn weight_next_while(&self) -> usize {
    self.weight(self.upstream.weight_next_while())
  }

  fn weight_skip(&self) -> usize {
    self.weight(self.upstream.weight_skip())
  }
}
