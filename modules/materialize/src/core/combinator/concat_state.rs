use alloc::{boxed::Box, sync::Arc, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AtOnceRule {
  /// Follows the leading source.
  Leading,
  /// Requires both sources.
  Both,
}

/// Yields every element of a leading source followed by every element of a trailing one.
///
/// Once the leading source reports its end the machine freezes into the trailing source,
/// renumbered to continue after the last leading index. Backs append, append-all, insert and
/// insert-all.
pub struct ConcatState<E> {
  first:   SharedIteratorMaterializer<E>,
  second:  SharedIteratorMaterializer<E>,
  emitted: AtomicUsize,
  rule:    AtOnceRule,
  batch:   ElementsBatch<E>,
}

impl<E: Clone + Send + Sync + 'static> ConcatState<E> {
  /// Appends `tail` to `upstream`. Whether it materializes at once follows `upstream` alone.
  #[must_use]
  pub fn append(upstream: SharedIteratorMaterializer<E>, tail: SharedIteratorMaterializer<E>) -> Self {
    Self::with_rule(upstream, tail, AtOnceRule::Leading)
  }

  /// Inserts `inserted` in front of `upstream`. Materializes at once only when both sources do.
  #[must_use]
  pub fn insert_all(inserted: SharedIteratorMaterializer<E>, upstream: SharedIteratorMaterializer<E>) -> Self {
    Self::with_rule(inserted, upstream, AtOnceRule::Both)
  }

  fn with_rule(first: SharedIteratorMaterializer<E>, second: SharedIteratorMaterializer<E>, rule: AtOnceRule) -> Self {
    Self { first, second, emitted: AtomicUsize::new(0), rule, batch: ElementsBatch::new() }
  }

  fn observe(&self, index: usize) {
    self.emitted.fetch_max(index + 1, Ordering::AcqRel);
  }

  fn advance(&self, machine: &StatefulIteratorMaterializer<E>) -> SharedIteratorMaterializer<E> {
    let base = self.emitted.load(Ordering::Acquire);
    machine.freeze(WrappingIteratorMaterializer::shared(self.second.clone(), base))
  }
}

struct ConcatNext<E> {
  state:      Arc<ConcatState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxIndexedFutureConsumer<E>>,
}

impl<E: Clone + Send + Sync + 'static> IndexedFutureConsumer<E> for ConcatNext<E> {
  fn accept(&mut self, size: Option<usize>, index: usize, element: E) -> Result<(), MaterializeError> {
    self.state.observe(index);
    if let Some(downstream) = self.downstream.as_mut() {
      let size = saturating_size_add(size, self.state.second.known_size());
      invoke::accept_indexed(downstream.as_mut(), size, index, element);
    }
    Ok(())
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.emitted.fetch_max(size, Ordering::AcqRel);
    if let Some(downstream) = self.downstream.take() {
      self.state.advance(&self.machine).materialize_next(downstream);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct ConcatWhile<E> {
  state:      Arc<ConcatState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxIndexedFuturePredicate<E>>,
}

impl<E: Clone + Send + Sync + 'static> IndexedFuturePredicate<E> for ConcatWhile<E> {
  fn test(&mut self, size: Option<usize>, index: usize, element: E) -> Result<bool, MaterializeError> {
    self.state.observe(index);
    let Some(downstream) = self.downstream.as_mut() else {
      return Ok(false);
    };
    let size = saturating_size_add(size, self.state.second.known_size());
    Ok(invoke::test_indexed(downstream.as_mut(), size, index, element))
  }

  fn complete(&mut self, size: usize) -> Result<(), MaterializeError> {
    self.state.emitted.fetch_max(size, Ordering::AcqRel);
    if let Some(downstream) = self.downstream.take() {
      self.state.advance(&self.machine).materialize_next_while(downstream);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct ConcatElements<E> {
  state:      Arc<ConcatState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxFutureConsumer<Vec<E>>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<Vec<E>> for ConcatElements<E> {
  fn accept(&mut self, prefix: Vec<E>) -> Result<(), MaterializeError> {
    if let Some(downstream) = self.downstream.take() {
      let rest = PrefixedElements {
        state: self.state.clone(),
        machine: self.machine.clone(),
        prefix,
        downstream: Some(downstream),
      };
      self.state.second.materialize_elements(Box::new(rest));
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

/// Joins the trailing elements to the leading ones; the machine stays running until both arrived.
struct PrefixedElements<E> {
  state:      Arc<ConcatState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  prefix:     Vec<E>,
  downstream: Option<BoxFutureConsumer<Vec<E>>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<Vec<E>> for PrefixedElements<E> {
  fn accept(&mut self, rest: Vec<E>) -> Result<(), MaterializeError> {
    let mut elements = core::mem::take(&mut self.prefix);
    elements.extend(rest);
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

struct ConcatHasNext<E> {
  state:      Arc<ConcatState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  downstream: Option<BoxFutureConsumer<bool>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<bool> for ConcatHasNext<E> {
  fn accept(&mut self, has_next: bool) -> Result<(), MaterializeError> {
    let Some(mut downstream) = self.downstream.take() else {
      return Ok(());
    };
    if has_next {
      invoke::accept(downstream.as_mut(), true);
    } else {
      self.state.advance(&self.machine).materialize_has_next(downstream);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

struct ConcatSkip<E> {
  state:      Arc<ConcatState<E>>,
  machine:    StatefulIteratorMaterializer<E>,
  count:      usize,
  downstream: Option<BoxFutureConsumer<usize>>,
}

impl<E: Clone + Send + Sync + 'static> FutureConsumer<usize> for ConcatSkip<E> {
  fn accept(&mut self, skipped: usize) -> Result<(), MaterializeError> {
    self.state.emitted.fetch_add(skipped, Ordering::AcqRel);
    let Some(mut downstream) = self.downstream.take() else {
      return Ok(());
    };
    if skipped >= self.count {
      invoke::accept(downstream.as_mut(), skipped);
    } else {
      self
        .state
        .advance(&self.machine)
        .materialize_skip(self.count - skipped, SkipOffsetConsumer::boxed(downstream, skipped));
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut downstream) = self.downstream.take() {
      downstream.error(self.machine.fail_with(error));
    }
  }
}

impl<E: Clone + Send + Sync + 'static> ImmaterialState<E> for ConcatState<E> {
  fn known_size(&self) -> Option<usize> {
    saturating_size_add(self.first.known_size(), self.second.known_size())
  }

  fn is_materialized_at_once(&self) -> bool {
    match self.rule {
      | AtOnceRule::Leading => self.first.is_materialized_at_once(),
      | AtOnceRule::Both => self.first.is_materialized_at_once() && self.second.is_materialized_at_once(),
    }
  }

  fn materialize_cancel(self: Arc<Self>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError) {
    self.first.materialize_cancel(error.clone());
    self.second.materialize_cancel(error.clone());
    machine.set_cancelled(error);
  }

  fn materialize_elements(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<Vec<E>>,
  ) {
    let Some(downstream) = self.batch.join(consumer) else {
      return;
    };
    let first = self.first.clone();
    first.materialize_elements(Box::new(ConcatElements {
      state:      self,
      machine:    machine.clone(),
      downstream: Some(downstream),
    }));
  }

  fn materialize_has_next(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    consumer: BoxFutureConsumer<bool>,
  ) {
    let first = self.first.clone();
    first.materialize_has_next(Box::new(ConcatHasNext {
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
    let first = self.first.clone();
    first.materialize_next(Box::new(ConcatNext { state: self, machine: machine.clone(), downstream: Some(consumer) }));
  }

  fn materialize_next_while(
    self: Arc<Self>,
    machine: &StatefulIteratorMaterializer<E>,
    predicate: BoxIndexedFuturePredicate<E>,
  ) {
    let first = self.first.clone();
    first.materialize_next_while(Box::new(ConcatWhile {
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
    let first = self.first.clone();
    first.materialize_skip(
      count,
      Box::new(ConcatSkip { state: self, machine: machine.clone(), count, downstream: Some(consumer) }),
    );
  }

  fn weight_cancel(&self) -> usize {
    saturating_weight_add(self.first.weight_cancel(), self.second.weight_cancel())
  }

  fn weight_elements(&self) -> usize {
    saturating_weight_add(self.first.weight_elements(), self.second.weight_elements())
  }

  fn weight_has_next(&self) -> usize {
    saturating_weight_add(self.first.weight_has_next(), self.second.weight_has_next())
  }

  fn weight_next(&self) -> usize {
    saturating_weight_add(self.first.weight_next(), self.second.weight_next())
  }

  fn weight_next_while(&self) -> usize {
    saturating_weight_add(self.first.weight_next_while(), self.second.weight_next_while())
  }

  fn weight_skip(&self) -> usize {
    saturating_weight_add(self.first.weight_skip(), self.second.weight_skip())
  }
}
