use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

use spin::Mutex;

use super::{AggregateLogic, LogicFlow, SecondarySource};
use crate::core::{
  MaterializeError, saturating_weight_add,
  callback::{
    BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer, IndexedFuturePredicate,
  },
  iterator::{
    EmptyIteratorMaterializer, ImmaterialState, ListToIteratorMaterializer, SharedIteratorMaterializer,
    StatefulIteratorMaterializer, freeze_gate::FreezeGate, pending_request::PendingRequest,
  },
};

#[cfg(test)]
mod tests;

/// Aggregation combinator driven by an [`AggregateLogic`].
///
/// The first request starts one pass over the upstream; every request registered before the
/// result is known waits and is then answered from the realized result, in registration order.
pub struct AggregateState<In, R, L> {
  upstream:  SharedIteratorMaterializer<In>,
  secondary: Option<SecondarySource<In>>,
  logic:     Mutex<L>,
  gate:      FreezeGate<R>,
}

impl<In, R, L> AggregateState<In, R, L>
where
  In: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
  L: AggregateLogic<In, R>,
{
  /// Creates a single-source aggregation.
  #[must_use]
  pub fn new(upstream: SharedIteratorMaterializer<In>, logic: L) -> Self {
    Self::build(upstream, None, logic)
  }

  /// Creates an aggregation that first materializes `secondary` and hands it to
  /// [`AggregateLogic::prepare`].
  #[must_use]
  pub fn with_secondary(upstream: SharedIteratorMaterializer<In>, secondary: SecondarySource<In>, logic: L) -> Self {
    Self::build(upstream, Some(secondary), logic)
  }

  fn build(upstream: SharedIteratorMaterializer<In>, secondary: Option<SecondarySource<In>>, logic: L) -> Self {
    Self { upstream, secondary, logic: Mutex::new(logic), gate: FreezeGate::new() }
  }

  fn submit(self: Arc<Self>, machine: &StatefulIteratorMaterializer<R>, request: PendingRequest<R>) {
    if !self.gate.submit(machine, request) {
      return;
    }
    match &self.secondary {
      | Some(secondary) => {
        secondary.materialize_elements(Box::new(PrepareConsumer { state: self.clone(), machine: machine.clone() }));
      },
      | None => self.run(machine),
    }
  }

  fn run(self: &Arc<Self>, machine: &StatefulIteratorMaterializer<R>) {
    if self.logic.lock().is_settled() {
      self.finish(machine);
      return;
    }
    self.upstream.materialize_next_while(Box::new(AggregatePredicate {
      state:   self.clone(),
      machine: machine.clone(),
    }));
  }

  fn finish(&self, machine: &StatefulIteratorMaterializer<R>) {
    let result = self.logic.lock().finish();
    match result {
      | Ok(Some(value)) => {
        let _ = machine.set_done(Arc::new(ListToIteratorMaterializer::new(vec![value])));
      },
      | Ok(None) => {
        let _ = machine.set_done(Arc::new(EmptyIteratorMaterializer::new()));
      },
      | Err(error) => {
        machine.set_failed(error);
      },
    }
    self.gate.release(machine);
  }

  fn fail(&self, machine: &StatefulIteratorMaterializer<R>, error: MaterializeError) {
    machine.set_failed(error);
    self.gate.release(machine);
  }

  fn secondary_weight(&self) -> usize {
    self.secondary.as_ref().map_or(0, SecondarySource::weight_elements)
  }
}

struct PrepareConsumer<In, R, L> {
  state:   Arc<AggregateState<In, R, L>>,
  machine: StatefulIteratorMaterializer<R>,
}

impl<In, R, L> FutureConsumer<Vec<In>> for PrepareConsumer<In, R, L>
where
  In: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
  L: AggregateLogic<In, R>,
{
  fn accept(&mut self, secondary: Vec<In>) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    self.state.logic.lock().prepare(secondary);
    self.state.run(&self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.state.fail(&self.machine, error);
  }
}

struct AggregatePredicate<In, R, L> {
  state:   Arc<AggregateState<In, R, L>>,
  machine: StatefulIteratorMaterializer<R>,
}

impl<In, R, L> IndexedFuturePredicate<In> for AggregatePredicate<In, R, L>
where
  In: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
  L: AggregateLogic<In, R>,
{
  fn test(&mut self, _size: Option<usize>, index: usize, element: In) -> Result<bool, MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(false);
    }
    let flow = self.state.logic.lock().apply(index, element);
    match flow {
      | Ok(LogicFlow::Continue) => Ok(true),
      | Ok(LogicFlow::Stop) => {
        self.state.finish(&self.machine);
        Ok(false)
      },
      | Err(error) => {
        self.state.fail(&self.machine, error);
        Ok(false)
      },
    }
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    if !self.machine.is_frozen() {
      self.state.finish(&self.machine);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.state.fail(&self.machine, error);
  }
}

impl<In, R, L> ImmaterialState<R> for AggregateState<In, R, L>
where
  In: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
  L: AggregateLogic<In, R>,
{
  fn known_size(&self) -> Option<usize> {
    self.logic.lock().result_size()
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once()
      && self.secondary.as_ref().is_none_or(SecondarySource::is_materialized_at_once)
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<R>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    if let Some(secondary) = &self.secondary {
      secondary.materialize_cancel(error.clone());
    }
    machine.set_cancelled(error);
    self.gate.release(machine);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<R>,
    consumer: BoxFutureConsumer<Vec<R>>,
  ) {
    self.submit(machine, PendingRequest::elements(consumer));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<R>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    self.submit(machine, PendingRequest::HasNext(consumer));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<R>,
    consumer: BoxIndexedFutureConsumer<R>,
  ) {
    self.submit(machine, PendingRequest::Next(consumer));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<R>,
    predicate: BoxIndexedFuturePredicate<R>,
  ) {
    self.submit(machine, PendingRequest::NextWhile(predicate));
  }

  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<R>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  ) {
    self.submit(machine, PendingRequest::skip(count, consumer));
  }

  fn weight_elements(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next_while(), self.secondary_weight())
  }

  fn weight_has_next(&self) -> usize {
    self.weight_elements()
  }

  fn weight_next(&self) -> usize {
    self.weight_elements()
  }

  fn weight_next_while(&self) -> usize {
    self.weight_elements()
  }

  fn weight_skip(&self) -> usize {
    self.weight_elements()
  }
}
