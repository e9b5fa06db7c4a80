use alloc::{boxed::Box, sync::Arc, vec::Vec};

use spin::Mutex;

use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, IndexedFutureConsumer},
  iterator::{
    ImmaterialState, SharedIteratorMaterializer, StatefulIteratorMaterializer,
    output_pump::{self, Pump, PumpQueue},
    pending_request::PendingRequest,
  },
};


enum FlatMapMode<Out> {
  /// The next pull asks the outer upstream for its next element.
  PullingOuter,
  /// The next pull drains the nested materializer.
  DrainingNested(SharedIteratorMaterializer<Out>),
}

struct FlatMapCore<Out> {
  queue: PumpQueue<Out>,
  mode:  FlatMapMode<Out>,
}

/// Replaces every upstream element with a nested materializer and concatenates them.
///
/// A nested materializer known to be empty is skipped without being pulled.
pub struct FlatMapState<In, Out, F> {
  upstream: SharedIteratorMaterializer<In>,
  expand:   F,
  core:     Mutex<FlatMapCore<Out>>,
}

impl<In, Out, F> FlatMapState<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
  F: Fn(usize, In) -> SharedIteratorMaterializer<Out> + Send + Sync + 'static,
{
  /// Creates the combinator.
  #[must_use]
  pub fn new(upstream: SharedIteratorMaterializer<In>, expand: F) -> Self {
    let core = FlatMapCore { queue: PumpQueue::new(), mode: FlatMapMode::PullingOuter };
    Self { upstream, expand, core: Mutex::new(core) }
  }

  fn nested(&self) -> Option<SharedIteratorMaterializer<Out>> {
    match &self.core.lock().mode {
      | FlatMapMode::DrainingNested(nested) => Some(nested.clone()),
      | FlatMapMode::PullingOuter => None,
    }
  }
}

impl<In, Out, F> Pump<Out> for FlatMapState<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
  F: Fn(usize, In) -> SharedIteratorMaterializer<Out> + Send + Sync + 'static,
{
  fn with_queue<R>(&self, f: impl FnOnce(&mut PumpQueue<Out>) -> R) -> R {
    f(&mut self.core.lock().queue)
  }

  fn pull(self: &Arc<Self>, machine: &StatefulIteratorMaterializer<Out>) {
    match self.nested() {
      | Some(nested) => {
        nested.materialize_next(Box::new(NestedConsumer { state: self.clone(), machine: machine.clone() }));
      },
      | None => {
        self.upstream.materialize_next(Box::new(OuterConsumer { state: self.clone(), machine: machine.clone() }));
      },
    }
  }

  fn remaining(&self) -> Option<usize> {
    let upstream = self.upstream.known_size();
    let core = self.core.lock();
    if let Some(size) = core.queue.exhausted_size() {
      return Some(size);
    }
    match (&core.mode, upstream) {
      | (FlatMapMode::PullingOuter, Some(0)) => Some(core.queue.output.len()),
      | _ => None,
    }
  }
}

struct OuterConsumer<In, Out, F> {
  state:   Arc<FlatMapState<In, Out, F>>,
  machine: StatefulIteratorMaterializer<Out>,
}

impl<In, Out, F> IndexedFutureConsumer<In> for OuterConsumer<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
  F: Fn(usize, In) -> SharedIteratorMaterializer<Out> + Send + Sync + 'static,
{
  fn accept(&mut self, _size: Option<usize>, index: usize, element: In) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    let nested = (self.state.expand)(index, element);
    {
      let mut core = self.state.core.lock();
      core.queue.pulling = false;
      if nested.known_size() != Some(0) {
        core.mode = FlatMapMode::DrainingNested(nested);
      }
    }
    output_pump::drive(&self.state, &self.machine);
    Ok(())
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    {
      let mut core = self.state.core.lock();
      core.queue.pulling = false;
      core.queue.exhausted = true;
    }
    output_pump::drive(&self.state, &self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    output_pump::fail(&self.state, &self.machine, error);
  }
}

struct NestedConsumer<In, Out, F> {
  state:   Arc<FlatMapState<In, Out, F>>,
  machine: StatefulIteratorMaterializer<Out>,
}

impl<In, Out, F> IndexedFutureConsumer<Out> for NestedConsumer<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
  F: Fn(usize, In) -> SharedIteratorMaterializer<Out> + Send + Sync + 'static,
{
  fn accept(&mut self, _size: Option<usize>, _index: usize, element: Out) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    {
      let mut core = self.state.core.lock();
      core.queue.pulling = false;
      core.queue.output.push_back(element);
    }
    output_pump::drive(&self.state, &self.machine);
    Ok(())
  }

  fn complete(&mut self, _size: usize) -> Result<(), MaterializeError> {
    if self.machine.is_frozen() {
      return Ok(());
    }
    {
      let mut core = self.state.core.lock();
      core.queue.pulling = false;
      core.mode = FlatMapMode::PullingOuter;
    }
    output_pump::drive(&self.state, &self.machine);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    output_pump::fail(&self.state, &self.machine, error);
  }
}

impl<In, Out, F> ImmaterialState<Out> for FlatMapState<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
  F: Fn(usize, In) -> SharedIteratorMaterializer<Out> + Send + Sync + 'static,
{
  fn known_size(&self) -> Option<usize> {
    <Self as Pump<Out>>::remaining(self)
  }

  fn is_materialized_at_once(&self) -> bool {
    false
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<Out>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    if let Some(nested) = self.nested() {
      nested.materialize_cancel(error.clone());
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

  fn weight_elements(&self) -> usize {
    self.upstream.weight_elements()
  }

  fn weight_has_next(&self) -> usize {
    self.upstream.weight_next()
  }

  fn weight_next(&self) -> usize {
    self.upstream.weight_next()
  }

  fn weight_next_while(&self) -> usize {
    self.upstream.weight_next_while()
  }

  fn weight_skip(&self) -> usize {
    self.upstream.weight_skip()
  }
}
