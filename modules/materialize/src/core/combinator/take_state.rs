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
    elements_batch::ElementsBatch, elements_collector::ElementsCollector,
  },
};


/// Yields at most the first `limit` upstream elements.
///
/// Every delivered element reserves one slot before it is pulled, so the upstream is never asked
/// for an element past the limit. Once the limit is reached, or the upstream ends first, the
/// machine freezes into an exhausted state.
pub struct TakeState<E> {
  upstream: SharedIteratorMaterializer<E>,
  limit:    usize,
  taken:    AtomicUsize,
  batch:    ElementsBatch<E>,
}

impl<E: Clone + Send + Sync + 'static> TakeState<E> {
  /// Creates the combinator.
  #[must_use]
  pub fn new(upstream: SharedIteratorMaterializer<E>, limit: usize) -> Self {
    Self { upstream, limit, taken: AtomicUsize::new(0), batch: ElementsBatch::new() }
  }

  fn left(&self) -> usize {
    self.limit.saturating_sub(self.taken.load(Ordering::Acquire))
  }

  /// Reserves up to `count` slots, returning how many were granted.
  fn reserve(&self, count: usize) -> usize {
    let mut granted = 0;
    let _ = self.taken.fetch_update(Ordering::AcqRel, Ordering::Acquire, |taken| {
      granted = count.min(self.limit.saturating_sub(taken));
      (granted > 0).then_some(taken + granted)
    });
    granted
  }

  fn give_back(&self, count: usize) {
    if count > 0 {
      self.taken.fetch_sub(count, Ordering::AcqRel);
    }
  }

  fn exhaust(&self, machine: &StatefulIteratorMaterializer<E>, size: usize) -> SharedIteratorMaterializer<E> {
    machine.freeze(Arc::new(EmptyIteratorMaterializer::exhausted(size)))
  }

  fn clamp(&self, size: Option<usize>) -> Option<usize> {
    Some(size.map_or(self.limit, |size| size.min(self.limit)))
  }
}

struct TakeNext<E> {
  state:      Arc<TakeState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: BoxIndexedFutureConsumer<E>,
}

impl<E: Clone + Send + Sync + 'static> IndexedFutureConsumer<E> for TakeNext<E> {
  fn accept(&mut self, size: Option<usize>, index: usize, element: E) -> Result<(), MaterializeError> {
    invoke::accept_indexed(self.downstream.as_mut(), self.state.clamp(size), index, element);
    Ok(())
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.give_back(1);
    let _ = self.state.exhaust(&self.machine, size);
    invoke::complete_indexed(self.downstream.as_mut(), size);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.state.give_back(1);
    self.downstream.error(self.machine.fail_with(error));
  }
}

struct TakeWhile<E> {
  state:      Arc<TakeState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxIndexedFuturePredicate<E>>,
}

impl<E: Clone + Send + Sync + 'static> IndexedFuturePredicate<E> for TakeWhile<E> {
  fn test(&mut self, size: Option<usize>, index: usize, element: E) -> Result<bool, MaterializeError> {
    let Some(mut downstream) = self.downstream.take() else {
      return Ok(false);
    };
    if self.state.reserve(1) == 0 {
      // the slot was granted to a concurrent request
      self.state.exhaust(&self.machine, self.state.limit).materialize_next_while(downstream);
      return Ok(false);
    }
    if !invoke::test_indexed(downstream.as_mut(), self.state.clamp(size), index, element) {
      return Ok(false);
    }
    if self.state.left() == 0 {
      self.state.exhaust(&self.machine, index + 1).materialize_next_while(downstream);
      return Ok(false);
    }
    self.downstream = Some(downstream);
    Ok(true)
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    if let Some(mut downstream) = self.downstream.take() {
      let _ = self.state.exhaust(&self.machine, size);
      invoke::complete_predicate(downstream.as_mut(), size);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct TakeSkip<E> {
  state:      Arc<TakeState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  reserved:   usize,
  downstream: BoxFutureConsumer<usize>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<usize> for TakeSkip<E> {
  fn accept(&mut self, skipped: usize) -> Result<(), MaterializeError> {
    self.state.give_back(self.reserved.saturating_sub(skipped));
    invoke::accept(self.downstream.as_mut(), skipped);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.state.give_back(self.reserved);
    self.downstream.error(self.machine.fail_with(error));
  }
}

struct TakeHasNext<E> {
  machine:    StatefulIteratorMaterializer<E>,
  downstream: BoxFutureConsumer<bool>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<bool> for TakeHasNext<E> {
  fn accept(&mut self, has_next: bool) -> Result<(), MaterializeError> {
    invoke::accept(self.downstream.as_mut(), has_next);
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(self.machine.fail_with(error));
  }
}

impl<E: Clone + Send + Sync + 'static> ImmaterialState<E> for TakeState<E> {
  fn known_size(&self) -> Option<usize> {
    let left = self.left();
    match self.upstream.known_size() {
      | Some(size) => Some(size.min(left)),
      | None if left == 0 => Some(0),
      | None => None,
    }
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once()
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    machine.set_cancelled(error);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<Vec<E>>,
  ) {
    if let Some(downstream) = self.batch.join(consumer) {
      self.materialize_next_while(machine, Box::new(ElementsCollector::new(downstream)));
    }
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    if self.left() == 0 {
      self.exhaust(machine, self.limit).materialize_has_next(consumer);
      return;
    }
    self.upstream.materialize_has_next(Box::new(TakeHasNext { machine: machine.clone(), downstream: consumer }));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxIndexedFutureConsumer<E>,
  ) {
    if self.reserve(1) == 0 {
      self.exhaust(machine, self.limit).materialize_next(consumer);
      return;
    }
    let upstream = self.upstream.clone();
    upstream.materialize_next(Box::new(TakeNext { state: self, machine: machine.clone(), downstream: consumer }));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    predicate: BoxIndexedFuturePredicate<E>,
  ) {
    if self.left() == 0 {
      self.exhaust(machine, self.limit).materialize_next_while(predicate);
      return;
    }
    let upstream = self.upstream.clone();
    upstream.materialize_next_while(Box::new(TakeWhile {
      state:      self,
      machine:    machine.clone(),
      downstream: Some(predicate),
    }));
  }

  fn materialize_skip(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    count: usize,
    consumer: BoxFutureConsumer<usize>,
  ) {
    let reserved = self.reserve(count);
    if reserved == 0 {
      let mut consumer = consumer;
      invoke::accept(consumer.as_mut(), 0);
      return;
    }
    let upstream = self.upstream.clone();
    upstream.materialize_skip(
      reserved,
      Box::new(TakeSkip { state: self, machine: machine.clone(), reserved, downstream: consumer }),
    );
  }

  fn weight_cancel(&self) -> usize {
    self.upstream.weight_cancel()
  }

  fn weight_elements(&self) -> usize {
    self.upstream.weight_next_while()
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
