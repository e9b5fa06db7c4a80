use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

use spin::Mutex;

use super::ConcatState;
use crate::core::{
  MaterializeError, saturating_weight_add,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, IndexedFuturePredicate},
  iterator::{
    EmptyIteratorMaterializer, ImmaterialState, ListToIteratorMaterializer, SharedIteratorMaterializer,
    StatefulIteratorMaterializer, WrappingIteratorMaterializer, freeze_gate::FreezeGate,
    pending_request::PendingRequest,
  },
};


/// Discards upstream elements while an indexed predicate holds.
///
/// The first element failing the predicate is kept; the machine then freezes into that element
/// followed by the rest of the upstream, numbered from zero.
pub struct DropWhileState<E, F> {
  upstream:  SharedIteratorMaterializer<E>,
  predicate: Mutex<F>,
  gate:      FreezeGate<E>,
}

impl<E, F> DropWhileState<E, F>
where
  E: Clone + Send + Sync + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  /// Creates the combinator.
  #[must_use]
  pub const fn new(upstream: SharedIteratorMaterializer<E>, predicate: F) -> Self {
    Self { upstream, predicate: Mutex::new(predicate), gate: FreezeGate::new() }
  }

  fn submit(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, request: PendingRequest<E>) {
    if self.gate.submit(machine, request) {
      let upstream = self.upstream.clone();
      upstream.materialize_next_while(Box::new(DropWhilePredicate { state: self, machine: machine.clone() }));
    }
  }
}

struct DropWhilePredicate<E, F> {
  state:   Arc<DropWhileState<E, F>>,
  machine: StatefulIteratorMaterializer<E>,
}

impl<E, F> IndexedFuturePredicate<E> for DropWhilePredicate<E, F>
where
  E: Clone + Send + Sync + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn test(&mut self, _size: Option<usize>, index: usize, element: E) -> Result<bool, MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(false);
    }
    let dropped = {
      let mut predicate = self.state.predicate.lock();
      (*predicate)(index, &element)
    };
    if dropped {
      return Ok(true);
    }
    let head: SharedIteratorMaterializer<E> = Arc::new(ListToIteratorMaterializer::new(vec![element]));
    let rest = StatefulIteratorMaterializer::new(
      self.machine.cancel_signal().clone(),
      ConcatState::insert_all(head, self.state.upstream.clone()),
    );
    let _ = self.machine.freeze(WrappingIteratorMaterializer::shared(rest.shared(), 0));
    self.state.gate.release(&self.machine);
    Ok(false)
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    let _ = self.machine.freeze(Arc::new(EmptyIteratorMaterializer::new()));
    self.state.gate.release(&self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.machine.set_failed(error);
    self.state.gate.release(&self.machine);
  }
}

impl<E, F> ImmaterialState<E> for DropWhileState<E, F>
where
  E: Clone + Send + Sync + 'static,
  F: FnMut(usize, &E) -> bool + Send + 'static,
{
  fn known_size(&self) -> Option<usize> {
    self.upstream.known_size().filter(|size| *size == 0)
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
    saturating_weight_add(self.upstream.weight_next_while(), self.upstream.weight_elements())
  }

  fn weight_has_next(&self) -> usize {
    self.upstream.weight_next_while()
  }

  fn weight_next(&self) -> usize {
    self.upstream.weight_next_while()
  }

  fn weight_next_while(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next_while(), self.upstream.weight_next_while())
  }

  fn weight_skip(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next_while(), self.upstream.weight_skip())
  }
}
