use alloc::{boxed::Box, sync::Arc, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

use crate::core::{
  MaterializeError,
  callback::{
    BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer, IndexedFutureConsumer,
    IndexedFuturePredicate, invoke,
  },
  iterator::{
    EmptyIteratorMaterializer, ImmaterialState, SharedIteratorMaterializer, StatefulIteratorMaterializer,
    elements_batch::ElementsBatch,
  },
};

#[cfg(test)]
mod tests;

/// Applies an indexed function to every element, preserving the known size.
///
/// Every operation is forwarded to the upstream; the machine freezes into an exhausted state once
/// the upstream reports its end. Concurrent `materialize_elements` callers share one upstream
/// request and one mapped list.
pub struct MapState<In, Out, F> {
  upstream: SharedIteratorMaterializer<In>,
  mapper:   F,
  position: AtomicUsize,
  batch:    ElementsBatch<Out>,
  _pd:      core::marker::PhantomData<fn() -> Out>,
}

impl<In, Out, F> MapState<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + 'static,
  F: Fn(usize, In) -> Out + Send + Sync + 'static,
{
  /// Creates the combinator.
  #[must_use]
  pub fn new(upstream: SharedIteratorMaterializer<In>, mapper: F) -> Self {
    Self {
      upstream,
      mapper,
      position: AtomicUsize::new(0),
      batch:    ElementsBatch::new(),
      _pd:      core::marker::PhantomData,
    }
  }

  fn observe(&self, index: usize) {
    self.position.fetch_max(index + 1, Ordering::AcqRel);
  }

  fn exhaust(&self, machine: &StatefulIteratorMaterializer<Out>, size: usize) {
    let _ = machine.freeze(Arc::new(EmptyIteratorMaterializer::exhausted(size)));
  }
}

struct MapElements<In, Out, F> {
  state:      Arc<MapState<In, Out, F>>,
  machine:    StatefulIteratorMaterializer<Out>,
  downstream: BoxFutureConsumer<Vec<Out>>,
}

impl<In, Out, F> FutureConsumer<Vec<In>> for MapElements<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + 'static,
  F: Fn(usize, In) -> Out + Send + Sync + 'static,
{
  fn accept(&mut self, elements: Vec<In>) -> Result<(), MaterializeError> {
    let base = self.state.position.fetch_add(elements.len(), Ordering::AcqRel);
    let mapped: Vec<Out> =
      elements.into_iter().enumerate().map(|(offset, element)| (self.state.mapper)(base + offset, element)).collect();
    self.state.exhaust(&self.machine, base + mapped.len());
    invoke::accept(self.downstream.as_mut(), mapped);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(self.machine.fail_with(error));
  }
}

struct MapNext<In, Out, F> {
  state:      Arc<MapState<In, Out, F>>,
  machine:    StatefulIteratorMaterializer<Out>,
  downstream: BoxIndexedFutureConsumer<Out>,
}

impl<In, Out, F> IndexedFutureConsumer<In> for MapNext<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + 'static,
  F: Fn(usize, In) -> Out + Send + Sync + 'static,
{
  fn accept(&mut self, size: Option<usize>, index: usize, element: In) -> Result<(), MaterializeError> {
    self.state.observe(index);
    let mapped = (self.state.mapper)(index, element);
    invoke::accept_indexed(self.downstream.as_mut(), size, index, mapped);
    Ok(())
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.exhaust(&self.machine, size);
    invoke::complete_indexed(self.downstream.as_mut(), size);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(self.machine.fail_with(error));
  }
}

struct MapWhile<In, Out, F> {
  state:      Arc<MapState<In, Out, F>>,
  machine:    StatefulIteratorMaterializer<Out>,
  downstream: BoxIndexedFuturePredicate<Out>,
}

impl<In, Out, F> IndexedFuturePredicate<In> for MapWhile<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + 'static,
  F: Fn(usize, In) -> Out + Send + Sync + 'static,
{
  fn test(&mut self, size: Option<usize>, index: usize, element: In) -> Result<bool, MaterializeError> {
    self.state.observe(index);
    let mapped = (self.state.mapper)(index, element);
    Ok(invoke::test_indexed(self.downstream.as_mut(), size, index, mapped))
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.exhaust(&self.machine, size);
    invoke::complete_predicate(self.downstream.as_mut(), size);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(self.machine.fail_with(error));
  }
}

struct MapSkip<In, Out, F> {
  state:      Arc<MapState<In, Out, F>>,
  machine:    StatefulIteratorMaterializer<Out>,
  downstream: BoxFutureConsumer<usize>,
}

impl<In, Out, F> FutureConsumer<usize> for MapSkip<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + 'static,
  F: Fn(usize, In) -> Out + Send + Sync + 'static,
{
  fn accept(&mut self, skipped: usize) -> Result<(), MaterializeError> {
    self.state.position.fetch_add(skipped, Ordering::AcqRel);
    invoke::accept(self.downstream.as_mut(), skipped);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(self.machine.fail_with(error));
  }
}

struct MapHasNext<Out> {
  machine:    StatefulIteratorMaterializer<Out>,
  downstream: BoxFutureConsumer<bool>,
}

impl<Out: Send + 'static> FutureConsumer<bool> for MapHasNext<Out> {
  fn accept(&mut self, has_next: bool) -> Result<(), MaterializeError> {
    invoke::accept(self.downstream.as_mut(), has_next);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(self.machine.fail_with(error));
  }
}

impl<In, Out, F> ImmaterialState<Out> for MapState<In, Out, F>
where
  In: Send + 'static,
  Out: Clone + Send + 'static,
  F: Fn(usize, In) -> Out + Send + Sync + 'static,
{
  fn known_size(&self) -> Option<usize> {
    self.upstream.known_size()
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once()
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<Out>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    machine.set_cancelled(error);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    consumer: BoxFutureConsumer<Vec<Out>>,
  ) {
    let Some(downstream) = self.batch.join(consumer) else {
      return;
    };
    let upstream = self.upstream.clone();
    upstream.materialize_elements(Box::new(MapElements { state: self, machine: machine.clone(), downstream }));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    self.upstream.materialize_has_next(Box::new(MapHasNext { machine: machine.clone(), downstream: consumer }));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    consumer: BoxIndexedFutureConsumer<Out>,
  ) {
    let upstream = self.upstream.clone();
    upstream.materialize_next(Box::new(MapNext { state: self, machine: machine.clone(), downstream: consumer }));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    predicate: BoxIndexedFuturePredicate<Out>,
  ) {
    let upstream = self.upstream.clone();
    upstream.materialize_next_while(Box::new(MapWhile {
      state:      self,
      machine:    machine.clone(),
      downstream: predicate,
    }));
  }

  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<Out>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  ) {
    let upstream = self.upstream.clone();
    upstream.materialize_skip(count, Box::new(MapSkip { state: self, machine: machine.clone(), downstream: consumer }));
  }

  fn weight_cancel(&self) -> usize {
    self.upstream.weight_cancel()
  }

  fn weight_elements(&self) -> usize {
    self.upstream.weight_elements()
  }

  fn weight_has_next(&self) -> usize {
    self.upstream.weight_has_next()
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
