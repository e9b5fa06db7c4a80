use alloc::{boxed::Box, sync::Arc, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

use super::ConcatState;
use crate::core::{
  MaterializeError, saturating_size_add, saturating_weight_add,
  callback::{
    BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer, IndexedFutureConsumer,
    IndexedFuturePredicate, invoke,
  },
  iterator::{
    EmptyIteratorMaterializer, ImmaterialState, SharedIteratorMaterializer, StatefulIteratorMaterializer,
    WrappingIteratorMaterializer, elements_batch::ElementsBatch, pending_request::SkipOffsetConsumer,
  },
};

#[cfg(test)]
mod tests;

/// Inserts a sequence after the first `position` upstream elements.
///
/// Upstream elements are forwarded until the splice point; the machine then freezes into the
/// inserted sequence followed by the rest of the upstream, with indices continuing from
/// `position`. An upstream shorter than `position` gets the inserted sequence at its end.
/// `materialize_elements` takes the whole upstream in one batch and splices the inserted list
/// into it before freezing.
pub struct SpliceState<E> {
  upstream: SharedIteratorMaterializer<E>,
  inserted: SharedIteratorMaterializer<E>,
  position: usize,
  emitted:  AtomicUsize,
  batch:    ElementsBatch<E>,
}

impl<E: Clone + Send + Sync + 'static> SpliceState<E> {
  /// Creates the combinator.
  #[must_use]
  pub fn new(
    upstream: SharedIteratorMaterializer<E>,
    position: usize,
    inserted: SharedIteratorMaterializer<E>,
  ) -> Self {
    Self { upstream, inserted, position, emitted: AtomicUsize::new(0), batch: ElementsBatch::new() }
  }

  fn observe(&self, index: usize) {
    self.emitted.fetch_max(index + 1, Ordering::AcqRel);
  }

  fn at_splice_point(&self) -> bool {
    self.emitted.load(Ordering::Acquire) >= self.position
  }

  /// Freezes into the inserted sequence followed by the rest of the upstream.
  fn splice(&self, machine: &StatefulIteratorMaterializer<E>) -> SharedIteratorMaterializer<E> {
    let rest = StatefulIteratorMaterializer::new(
      machine.cancel_signal().clone(),
      ConcatState::insert_all(self.inserted.clone(), self.upstream.clone()),
    );
    machine.freeze(WrappingIteratorMaterializer::shared(rest.shared(), self.position))
  }

  /// Freezes into the inserted sequence after an upstream that ended early.
  fn append(&self, machine: &StatefulIteratorMaterializer<E>) -> SharedIteratorMaterializer<E> {
    let base = self.emitted.load(Ordering::Acquire);
    machine.freeze(WrappingIteratorMaterializer::shared(self.inserted.clone(), base))
  }

  fn hint(&self, size: Option<usize>) -> Option<usize> {
    saturating_size_add(size, self.inserted.known_size())
  }
}

struct SpliceNext<E> {
  state:      Arc<SpliceState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxIndexedFutureConsumer<E>>,
}

impl<E: Clone + Send + Sync + 'static> IndexedFutureConsumer<E> for SpliceNext<E> {
  fn accept(&mut self, size: Option<usize>, index: usize, element: E) -> Result<(), MaterializeError> {
    self.state.observe(index);
    if let Some(downstream) = self.downstream.as_mut() {
      invoke::accept_indexed(downstream.as_mut(), self.state.hint(size), index, element);
    }
    Ok(())
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.emitted.fetch_max(size, Ordering::AcqRel);
    if let Some(downstream) = self.downstream.take() {
      self.state.append(&self.machine).materialize_next(downstream);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct SpliceWhile<E> {
  state:      Arc<SpliceState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxIndexedFuturePredicate<E>>,
}

impl<E: Clone + Send + Sync + 'static> IndexedFuturePredicate<E> for SpliceWhile<E> {
  fn test(&mut self, size: Option<usize>, index: usize, element: E) -> Result<bool, MaterializeError> {
    let Some(mut downstream) = self.downstream.take() else {
      return Ok(false);
    };
    self.state.observe(index);
    if !invoke::test_indexed(downstream.as_mut(), self.state.hint(size), index, element) {
      return Ok(false);
    }
    if self.state.at_splice_point() {
      self.state.splice(&self.machine).materialize_next_while(downstream);
      return Ok(false);
    }
    self.downstream = Some(downstream);
    Ok(true)
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.emitted.fetch_max(size, Ordering::AcqRel);
    if let Some(downstream) = self.downstream.take() {
      self.state.append(&self.machine).materialize_next_while(downstream);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct SpliceElements<E> {
  state:      Arc<SpliceState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxFutureConsumer<Vec<E>>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<Vec<E>> for SpliceElements<E> {
  fn accept(&mut self, mut head: Vec<E>) -> Result<(), MaterializeError> {
    let Some(downstream) = self.downstream.take() else {
      return Ok(());
    };
    let offset = self.state.position.saturating_sub(self.state.emitted.load(Ordering::Acquire)).min(head.len());
    let tail = head.split_off(offset);
    let spliced = SplicedElements {
      state: self.state.clone(),
      machine: self.machine.clone(),
      head,
      tail,
      downstream: Some(downstream),
    };
    self.state.inserted.materialize_elements(Box::new(spliced));
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

/// Places the inserted elements between the two halves of the upstream batch.
struct SplicedElements<E> {
  state:      Arc<SpliceState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  head:       Vec<E>,
  tail:       Vec<E>,
  downstream: Option<BoxFutureConsumer<Vec<E>>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<Vec<E>> for SplicedElements<E> {
  fn accept(&mut self, inserted: Vec<E>) -> Result<(), MaterializeError> {
    let mut elements = core::mem::take(&mut self.head);
    elements.extend(inserted);
    elements.append(&mut self.tail);
    let size = self.state.emitted.fetch_add(elements.len(), Ordering::AcqRel) + elements.len();
    let _ = self.machine.freeze(Arc::new(EmptyIteratorMaterializer::exhausted(size)));
    if let Some(mut downstream) = self.downstream.take() {
      invoke::accept(downstream.as_mut(), elements);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct SpliceHasNext<E> {
  state:      Arc<SpliceState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxFutureConsumer<bool>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<bool> for SpliceHasNext<E> {
  fn accept(&mut self, has_next: bool) -> Result<(), MaterializeError> {
    let Some(mut downstream) = self.downstream.take() else {
      return Ok(());
    };
    if has_next {
      invoke::accept(downstream.as_mut(), true);
    } else {
      self.state.append(&self.machine).materialize_has_next(downstream);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct SpliceSkip<E> {
  state:      Arc<SpliceState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  count:      usize,
  chunk:      usize,
  downstream: Option<BoxFutureConsumer<usize>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<usize> for SpliceSkip<E> {
  fn accept(&mut self, skipped: usize) -> Result<(), MaterializeError> {
    self.state.emitted.fetch_add(skipped, Ordering::AcqRel);
    let Some(mut downstream) = self.downstream.take() else {
      return Ok(());
    };
    if skipped < self.chunk {
      let rest = self.count - skipped;
      self.state.append(&self.machine).materialize_skip(rest, SkipOffsetConsumer::boxed(downstream, skipped));
    } else if self.count > self.chunk {
      let rest = self.count - self.chunk;
      self.state.splice(&self.machine).materialize_skip(rest, SkipOffsetConsumer::boxed(downstream, skipped));
    } else {
      invoke::accept(downstream.as_mut(), skipped);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

impl<E: Clone + Send + Sync + 'static> ImmaterialState<E> for SpliceState<E> {
  fn known_size(&self) -> Option<usize> {
    saturating_size_add(self.upstream.known_size(), self.inserted.known_size())
  }

  fn is_materialized_at_once(&self) -> bool {
    self.upstream.is_materialized_at_once() && self.inserted.is_materialized_at_once()
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError) {
    self.upstream.materialize_cancel(error.clone());
    self.inserted.materialize_cancel(error.clone());
    machine.set_cancelled(error);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<Vec<E>>,
  ) {
    if self.at_splice_point() {
      self.splice(machine).materialize_elements(consumer);
      return;
    }
    let Some(downstream) = self.batch.join(consumer) else {
      return;
    };
    let upstream = self.upstream.clone();
    let elements = SpliceElements { state: self, machine: machine.clone(), downstream: Some(downstream) };
    upstream.materialize_elements(Box::new(elements));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    if self.at_splice_point() {
      self.splice(machine).materialize_has_next(consumer);
      return;
    }
    let upstream = self.upstream.clone();
    upstream.materialize_has_next(Box::new(SpliceHasNext {
      state:      self,
      machine:    machine.clone(),
      downstream: Some(consumer),
    }));
  }

  fn materialize_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxIndexedFutureConsumer<E>,
  ) {
    if self.at_splice_point() {
      self.splice(machine).materialize_next(consumer);
      return;
    }
    let upstream = self.upstream.clone();
    upstream.materialize_next(Box::new(SpliceNext {
      state:      self,
      machine:    machine.clone(),
      downstream: Some(consumer),
    }));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    predicate: BoxIndexedFuturePredicate<E>,
  ) {
    if self.at_splice_point() {
      self.splice(machine).materialize_next_while(predicate);
      return;
    }
    let upstream = self.upstream.clone();
    upstream
      .materialize_next_while(Box::new(SpliceWhile {
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
    if self.at_splice_point() {
      self.splice(machine).materialize_skip(count, consumer);
      return;
    }
    let chunk = count.min(self.position - self.emitted.load(Ordering::Acquire));
    let upstream = self.upstream.clone();
    upstream.materialize_skip(
      chunk,
      Box::new(SpliceSkip { state: self, machine: machine.clone(), count, chunk, downstream: Some(consumer) }),
    );
  }

  fn weight_cancel(&self) -> usize {
    saturating_weight_add(self.upstream.weight_cancel(), self.inserted.weight_cancel())
  }

  fn weight_elements(&self) -> usize {
    saturating_weight_add(self.upstream.weight_elements(), self.inserted.weight_elements())
  }

  fn weight_has_next(&self) -> usize {
    saturating_weight_add(self.upstream.weight_has_next(), self.inserted.weight_has_next())
  }

  fn weight_next(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next(), self.inserted.weight_next())
  }

  fn weight_next_while(&self) -> usize {
    saturating_weight_add(self.upstream.weight_next_while(), self.inserted.weight_next_while())
  }

  fn weight_skip(&self) -> usize {
    saturating_weight_add(self.upstream.weight_skip(), self.inserted.weight_skip())
  }
}
