use alloc::{boxed::Box, sync::Arc, vec::Vec};

use spin::Mutex;

use super::{LogicFlow, SecondarySource, TransformLogic};
use crate::core::{
  MaterializeError, saturating_size_add, saturating_weight_add,
  callback::{
    BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer, IndexedFutureConsumer,
  },
  iterator::{
    ImmaterialState, SharedIteratorMaterializer, StatefulIteratorMaterializer,
    output_pump::{self, Pump, PumpQueue},
    pending_request::PendingRequest,
  },
};

#[cfg(test)]
mod tests;

struct TransformCore<Out, L> {
  queue:    PumpQueue<Out>,
  logic:    L,
  prepared: bool,
}

/// Buffering combinator driven by a [`TransformLogic`].
///
/// When a secondary source is present it is materialized in full before the first upstream pull.
/// Upstream elements are pulled one at a time, only while a waiter needs more output.
pub struct TransformState<In, Out, L> {
  upstream:  SharedIteratorMaterializer<In>,
  secondary: Option<SecondarySource<In>>,
  core:      Mutex<TransformCore<Out, L>>,
}

impl<In, Out, L> TransformState<In, Out, L>
where
  In: Clone + Send + Sync + 'static,
  Out: Clone + Send + Sync + 'static,
  L: TransformLogic<In, Out>,
{
  /// Creates a single-source transform.
  #[must_use]
  pub fn new(upstream: SharedIteratorMaterializer<In>, logic: L) -> Self {
    Self::build(upstream, None, logic)
  }

  /// Creates a transform that first materializes `secondary` and hands it to
  /// [`TransformLogic::prepare`].
  #[must_use]
  pub fn with_secondary(upstream: SharedIteratorMaterializer<In>, secondary: SecondarySource<In>, logic: L) -> Self {
    Self::build(upstream, Some(secondary), logic)
  }

  fn build(upstream: SharedIteratorMaterializer<In>, secondary: Option<SecondarySource<In>>, logic: L) -> Self {
    let prepared = secondary.is_none();
    Self { upstream, secondary, core: Mutex::new(TransformCore { queue: PumpQueue::new(), logic, prepared }) }
  }

  fn secondary_weight(&self) -> usize {
    match &self.secondary {
      | Some(secondary) if !self.core.lock().prepared => secondary.weight_elements(),
      | _ => 0,
    }
  }

  fn on_element(&self, index: usize, element: In) -> Result<(), MaterializeError> {
    let mut core = self.core.lock();
    let TransformCore { queue, logic, .. } = &mut *core;
    queue.pulling = false;
    if logic.apply(index, element, &mut queue.output)? == LogicFlow::Stop {
      logic.on_upstream_complete(&mut queue.output)?;
      queue.exhausted = true;
    }
    Ok(())
  }

  fn on_complete(&self) -> Result<(), MaterializeError> {
    let mut core = self.core.lock();
    let TransformCore { queue, logic, .. } = &mut *core;
    queue.pulling = false;
    logic.on_upstream_complete(&mut queue.output)?;
    queue.exhausted = true;
    Ok(())
  }
}

impl<In, Out, L> Pump<Out> for TransformState<In, Out, L>
where
  In: Clone + Send + Sync + 'static,
  Out: Clone + Send + Sync + 'static,
  L: TransformLogic<In, Out>,
{
  fn with_queue<R>(&self, f: impl FnOnce(&mut PumpQueue<Out>) -> R) -> R {
    f(&mut self.core.lock().queue)
  }

  fn pull(self: &Arc<Self>, machine: &StatefulIteratorMaterializer<Out>) {
    let prepared = self.core.lock().prepared;
    match &self.secondary {
      | Some(secondary) if !prepared => {
        secondary.materialize_elements(Box::new(PrepareConsumer { state: self.clone(), machine: machine.clone() }));
      },
      | _ => {
        self.upstream.materialize_next(Box::new(TransformConsumer { state: self.clone(), machine: machine.clone() }));
      },
    }
  }

  fn remaining(&self) -> Option<usize> {
    let upstream = self.upstream.known_size();
    let core = self.core.lock();
    core
      .queue
      .exhausted_size()
      .or_else(|| saturating_size_add(core.logic.remaining(upstream), Some(core.queue.output.len())))
  }
}

struct PrepareConsumer<In, Out, L> {
  state:   Arc<TransformState<In, Out, L>>,
  machine: StatefulIteratorMaterializer<Out>,
}

impl<In, Out, L> FutureConsumer<Vec<In>> for PrepareConsumer<In, Out, L>
where
  In: Clone + Send + Sync + 'static,
  Out: Clone + Send + Sync + 'static,
  L: TransformLogic<In, Out>,
{
  fn accept(&mut self, secondary: Vec<In>) -> Result<(), MaterializeError> {
    {
      let mut core = self.state.core.lock();
      core.logic.prepare(secondary);
      core.prepared = true;
      core.queue.pulling = false;
    }
    output_pump::drive(&self.state, &self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    output_pump::fail(&self.state, &self.machine, error);
  }
}

struct TransformConsumer<In, Out, L> {
  state:   Arc<TransformState<In, Out, L>>,
  machine: StatefulIteratorMaterializer<Out>,
}

impl<In, Out, L> IndexedFutureConsumer<In> for TransformConsumer<In, Out, L>
where
  In: Clone + Send + Sync + 'static,
  Out: Clone + Send + Sync + 'static,
  L: TransformLogic<In, Out>,
{
  fn accept(&mut self, _size: Option<usize>, index: usize, element: In) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    match self.state.on_element(index, element) {
      | Ok(()) => output_pump::drive(&self.state, &self.machine),
      | Err(error) => output_pump::fail(&self.state, &self.machine, error),
    }
    Ok(())
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    match self.state.on_complete() {
      | Ok(()) => output_pump::drive(&self.state, &self.machine),
      | Err(error) => output_pump::fail(&self.state, &self.machine, error),
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    output_pump::fail(&self.state, &self.machine, error);
  }
}

impl<In, Out, L> ImmaterialState<Out> for TransformState<In, Out, L>
where
  In: Clone + Send + Sync + 'static,
  Out: Clone + Send + Sync + 'static,
  L: TransformLogic<In, Out>,
{
  fn known_size(&self) -> Option<usize> {
    <Self as Pump<Out>>::remaining(self)
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once()
      && self.secondary.as_ref().is_none_or(SecondarySource::is_materialized_at_once)
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<Out>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    if let Some(secondary) = &self.secondary {
      secondary.materialize_cancel(error.clone());
    }
    output_pump::cancel(&self, machine, error);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    consumer: BoxFutureConsumer<Vec<Out>>,
  ) {
    output_pump::submit(&self, machine, PendingRequest::elements(consumer));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    output_pump::submit(&self, machine, PendingRequest::HasNext(consumer));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    consumer: BoxIndexedFutureConsumer<Out>,
  ) {
    output_pump::submit(&self, machine, PendingRequest::Next(consumer));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    predicate: BoxIndexedFuturePredicate<Out>,
  ) {
    output_pump::submit(&self, machine, PendingRequest::NextWhile(predicate));
  }

  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  ) {
    output_pump::submit(&self, machine, PendingRequest::skip(count, consumer));
  }

  fn weight_cancel(&self) -> usize {
    saturating_weight_add(self.upstream.weight_cancel(), self.secondary.as_ref().map_or(0, |_| 1))
  }

  fn weight_elements(&self) -> usize {
    saturating_weight_add(self.upstream.weight_elements(), self.secondary_weight())
  }

  fn weight_has_next(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next(), self.secondary_weight())
  }

  fn weight_next(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next(), self.secondary_weight())
  }

  fn weight_next_while(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next_while(), self.secondary_weight())
  }

  fn weight_skip(&self) -> usize {
    saturating_weight_add(self.upstream.weight_skip(), self.secondary_weight())
  }
}
