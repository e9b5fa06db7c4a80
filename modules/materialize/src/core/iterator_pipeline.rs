use alloc::{collections::VecDeque, sync::Arc, vec, vec::Vec};
use core::{cmp::Ordering, hash::Hash};

use crate::core::{
  CancelSignal, MaterializeError,
  combinator::{
    AggregateLogic, AggregateState, AllLogic, ConcatState, CountLogic, CountWhereLogic, DiffLogic, DistinctByLogic,
    DropRightLogic, DropRightWhileLogic, DropState, DropWhileState, EndsWithLogic, ExistsLogic, FilterLogic,
    FindFirstLogic, FindIndexLogic, FindIndexOfSliceLogic, FindLastIndexLogic, FindLastIndexOfSliceLogic, FindLastLogic,
    FlatMapState, FoldLeftLogic, FoldRightLogic, IncludesAllLogic, IncludesSliceLogic, MapState, MaxLogic, OrElseState,
    ReduceLeftLogic, ReverseLogic, SecondarySource, SpliceState, StartsWithLogic, TakeRightLogic, TakeState,
    TakeWhileLogic, TransformLogic, TransformState,
  },
  context::{ScheduledIteratorMaterializer, SharedExecutionContext, TaskId},
  iterator::{
    CollectionToIteratorMaterializer, DequeToIteratorMaterializer, EmptyIteratorMaterializer, ImmaterialState,
    ListToIteratorMaterializer, SharedIteratorMaterializer, StatefulIteratorMaterializer,
  },
};


/// Wiring helper chaining combinators onto a head materializer.
///
/// Every stage created from one pipeline shares its [`CancelSignal`], so cancelling any stage is
/// observed by all of them. Each method consumes the pipeline and returns the next stage.
pub struct IteratorPipeline<E> {
  head:   SharedIteratorMaterializer<E>,
  cancel: CancelSignal,
}

impl<E> Clone for IteratorPipeline<E> {
  fn clone(&self) -> Self {
    Self { head: self.head.clone(), cancel: self.cancel.clone() }
  }
}

impl<E: Clone + Send + Sync + 'static> IteratorPipeline<E> {
  /// Starts a pipeline at `head`.
  #[must_use]
  pub const fn new(head: SharedIteratorMaterializer<E>, cancel: CancelSignal) -> Self {
    Self { head, cancel }
  }

  /// Starts a pipeline over realized elements.
  #[must_use]
  pub fn from_vec(elements: Vec<E>) -> Self {
    Self::new(Arc::new(ListToIteratorMaterializer::new(elements)), CancelSignal::new())
  }

  /// Starts a pipeline over a deque.
  #[must_use]
  pub fn from_deque(elements: VecDeque<E>) -> Self {
    Self::new(Arc::new(DequeToIteratorMaterializer::new(elements)), CancelSignal::new())
  }

  /// Starts a pipeline over an iterator of unknown length.
  #[must_use]
  pub fn from_iterator<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = E>,
    I::IntoIter: Send + 'static, {
    Self::new(Arc::new(CollectionToIteratorMaterializer::new(iter)), CancelSignal::new())
  }

  /// Starts a pipeline over realized elements whose drains are throttled on `context`.
  #[must_use]
  pub fn from_vec_on(elements: Vec<E>, context: SharedExecutionContext) -> Self {
    Self::new(Arc::new(ListToIteratorMaterializer::new(elements).with_context(context)), CancelSignal::new())
  }

  /// Starts an empty pipeline.
  #[must_use]
  pub fn empty() -> Self {
    Self::new(Arc::new(EmptyIteratorMaterializer::new()), CancelSignal::new())
  }

  /// Returns the materializer of the last stage.
  #[must_use]
  pub fn materializer(&self) -> SharedIteratorMaterializer<E> {
    self.head.clone()
  }

  /// Returns the cancellation signal shared by every stage.
  #[must_use]
  pub const fn cancel_signal(&self) -> &CancelSignal {
    &self.cancel
  }

  /// Cancels the last stage, which propagates upstream.
  pub fn cancel(&self, error: MaterializeError) {
    self.head.materialize_cancel(error);
  }

  fn install<Out, S>(self, state: S) -> IteratorPipeline<Out>
  where
    Out: Clone + Send + Sync + 'static,
    S: ImmaterialState<Out> + 'static, {
    let machine = StatefulIteratorMaterializer::new(self.cancel.clone(), state);
    IteratorPipeline { head: machine.shared(), cancel: self.cancel }
  }

  fn single(element: E) -> SharedIteratorMaterializer<E> {
    Arc::new(ListToIteratorMaterializer::new(vec![element]))
  }

  /// Dispatches every operation of the last stage as a task on `context`.
  #[must_use]
  pub fn scheduled(self, context: SharedExecutionContext, task_id: impl Into<TaskId>) -> Self {
    let scheduled = ScheduledIteratorMaterializer::new(self.head, context, task_id.into(), self.cancel.clone());
    Self { head: Arc::new(scheduled), cancel: self.cancel }
  }

  /// Drives a custom buffering logic.
  #[must_use]
  pub fn transform<Out, L>(self, logic: L) -> IteratorPipeline<Out>
  where
    Out: Clone + Send + Sync + 'static,
    L: TransformLogic<E, Out>, {
    let state = TransformState::new(self.head.clone(), logic);
    self.install(state)
  }

  /// Drives a custom aggregation logic.
  #[must_use]
  pub fn aggregate<R, L>(self, logic: L) -> IteratorPipeline<R>
  where
    R: Clone + Send + Sync + 'static,
    L: AggregateLogic<E, R>, {
    let state = AggregateState::new(self.head.clone(), logic);
    self.install(state)
  }

  fn aggregate_with<R, L>(self, secondary: SecondarySource<E>, logic: L) -> IteratorPipeline<R>
  where
    R: Clone + Send + Sync + 'static,
    L: AggregateLogic<E, R>, {
    let state = AggregateState::with_secondary(self.head.clone(), secondary, logic);
    self.install(state)
  }

  /// Applies `mapper` to every element.
  #[must_use]
  pub fn map<Out, F>(self, mapper: F) -> IteratorPipeline<Out>
  where
    Out: Clone + Send + Sync + 'static,
    F: Fn(usize, E) -> Out + Send + Sync + 'static, {
    let state = MapState::new(self.head.clone(), mapper);
    self.install(state)
  }

  /// Replaces every element with the elements of a nested materializer.
  #[must_use]
  pub fn flat_map<Out, F>(self, expand: F) -> IteratorPipeline<Out>
  where
    Out: Clone + Send + Sync + 'static,
    F: Fn(usize, E) -> SharedIteratorMaterializer<Out> + Send + Sync + 'static, {
    let state = FlatMapState::new(self.head.clone(), expand);
    self.install(state)
  }

  /// Keeps the elements matching `predicate`.
  #[must_use]
  pub fn filter<F>(self, predicate: F) -> Self
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.transform(FilterLogic::new(predicate))
  }

  /// Keeps the leading elements matching `predicate`.
  #[must_use]
  pub fn take_while<F>(self, predicate: F) -> Self
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.transform(TakeWhileLogic::new(predicate))
  }

  /// Keeps at most the first `count` elements.
  #[must_use]
  pub fn take(self, count: usize) -> Self {
    let state = TakeState::new(self.head.clone(), count);
    self.install(state)
  }

  /// Keeps at most the last `count` elements.
  #[must_use]
  pub fn take_right(self, count: usize) -> Self {
    self.transform(TakeRightLogic::new(count))
  }

  /// Discards the first `count` elements.
  #[must_use]
  pub fn drop(self, count: usize) -> Self {
    let state = DropState::new(self.head.clone(), count);
    self.install(state)
  }

  /// Discards the leading elements matching `predicate`.
  #[must_use]
  pub fn drop_while<F>(self, predicate: F) -> Self
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    let state = DropWhileState::new(self.head.clone(), predicate);
    self.install(state)
  }

  /// Discards the last `count` elements.
  #[must_use]
  pub fn drop_right(self, count: usize) -> Self {
    self.transform(DropRightLogic::new(count))
  }

  /// Discards the trailing elements matching `predicate`.
  #[must_use]
  pub fn drop_right_while<F>(self, predicate: F) -> Self
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.transform(DropRightWhileLogic::new(predicate))
  }

  /// Suppresses elements whose key was already seen.
  #[must_use]
  pub fn distinct_by<K, F>(self, key: F) -> Self
  where
    K: Eq + Hash + Send + 'static,
    F: FnMut(&E) -> K + Send + 'static, {
    self.transform(DistinctByLogic::new(key))
  }

  /// Removes one occurrence of every element of `other`.
  #[must_use]
  pub fn diff(self, other: impl Into<SecondarySource<E>>) -> Self
  where
    E: Eq + Hash, {
    let state = TransformState::with_secondary(self.head.clone(), other.into(), DiffLogic::new());
    self.install(state)
  }

  /// Reverses the order of the elements.
  #[must_use]
  pub fn reverse(self) -> Self {
    self.transform(ReverseLogic::new())
  }

  /// Appends one element.
  #[must_use]
  pub fn append(self, element: E) -> Self {
    self.append_all(Self::single(element))
  }

  /// Appends every element of `tail`.
  #[must_use]
  pub fn append_all(self, tail: SharedIteratorMaterializer<E>) -> Self {
    let state = ConcatState::append(self.head.clone(), tail);
    self.install(state)
  }

  /// Inserts one element in front.
  #[must_use]
  pub fn insert(self, element: E) -> Self {
    self.insert_all(Self::single(element))
  }

  /// Inserts every element of `inserted` in front.
  #[must_use]
  pub fn insert_all(self, inserted: SharedIteratorMaterializer<E>) -> Self {
    let state = ConcatState::insert_all(inserted, self.head.clone());
    self.install(state)
  }

  /// Inserts one element after the first `position` elements.
  #[must_use]
  pub fn insert_after(self, position: usize, element: E) -> Self {
    self.insert_all_after(position, Self::single(element))
  }

  /// Inserts every element of `inserted` after the first `position` elements.
  #[must_use]
  pub fn insert_all_after(self, position: usize, inserted: SharedIteratorMaterializer<E>) -> Self {
    let state = SpliceState::new(self.head.clone(), position, inserted);
    self.install(state)
  }

  /// Falls back to `alternative` when this pipeline turns out to be empty.
  #[must_use]
  pub fn or_else(self, alternative: SharedIteratorMaterializer<E>) -> Self {
    let state = OrElseState::new(self.head.clone(), alternative);
    self.install(state)
  }

  /// Counts the elements.
  #[must_use]
  pub fn count(self) -> IteratorPipeline<usize> {
    self.aggregate(CountLogic::new())
  }

  /// Counts the elements matching `predicate`.
  #[must_use]
  pub fn count_where<F>(self, predicate: F) -> IteratorPipeline<usize>
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(CountWhereLogic::new(predicate))
  }

  /// Finds the greatest element according to `compare`.
  #[must_use]
  pub fn max_by<F>(self, compare: F) -> Self
  where
    F: FnMut(&E, &E) -> Ordering + Send + 'static, {
    self.aggregate(MaxLogic::new(compare))
  }

  /// Finds the least element according to `compare`.
  #[must_use]
  pub fn min_by<F>(self, compare: F) -> Self
  where
    F: FnMut(&E, &E) -> Ordering + Send + 'static, {
    self.aggregate(MaxLogic::min(compare))
  }

  /// Finds the greatest element.
  #[must_use]
  pub fn max(self) -> Self
  where
    E: Ord, {
    self.max_by(E::cmp)
  }

  /// Finds the least element.
  #[must_use]
  pub fn min(self) -> Self
  where
    E: Ord, {
    self.min_by(E::cmp)
  }

  /// Answers whether any element matches `predicate`.
  #[must_use]
  pub fn exists<F>(self, predicate: F) -> IteratorPipeline<bool>
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(ExistsLogic::new(predicate))
  }

  /// Answers whether every element matches `predicate`.
  #[must_use]
  pub fn all<F>(self, predicate: F) -> IteratorPipeline<bool>
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(AllLogic::new(predicate))
  }

  /// Finds the first element matching `predicate`.
  #[must_use]
  pub fn find_first<F>(self, predicate: F) -> Self
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(FindFirstLogic::new(predicate))
  }

  /// Finds the index of the first element matching `predicate`.
  #[must_use]
  pub fn find_index<F>(self, predicate: F) -> IteratorPipeline<usize>
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(FindIndexLogic::new(predicate))
  }

  /// Finds the last element matching `predicate`.
  #[must_use]
  pub fn find_last<F>(self, predicate: F) -> Self
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(FindLastLogic::new(predicate))
  }

  /// Finds the index of the last element matching `predicate`.
  #[must_use]
  pub fn find_last_index<F>(self, predicate: F) -> IteratorPipeline<usize>
  where
    F: FnMut(usize, &E) -> bool + Send + 'static, {
    self.aggregate(FindLastIndexLogic::new(predicate))
  }

  /// Folds the elements from the first to the last.
  #[must_use]
  pub fn fold_left<A, F>(self, initial: A, fold: F) -> IteratorPipeline<A>
  where
    A: Clone + Send + Sync + 'static,
    F: FnMut(A, usize, E) -> A + Send + 'static, {
    self.aggregate(FoldLeftLogic::new(initial, fold))
  }

  /// Folds the elements from the last to the first.
  #[must_use]
  pub fn fold_right<A, F>(self, initial: A, fold: F) -> IteratorPipeline<A>
  where
    A: Clone + Send + Sync + 'static,
    F: FnMut(usize, E, A) -> A + Send + 'static, {
    self.aggregate(FoldRightLogic::new(initial, fold))
  }

  /// Reduces the elements from the first to the last.
  #[must_use]
  pub fn reduce_left<F>(self, reduce: F) -> Self
  where
    F: FnMut(E, usize, E) -> E + Send + 'static, {
    self.aggregate(ReduceLeftLogic::new(reduce))
  }

  /// Answers whether the elements begin with `prefix`.
  #[must_use]
  pub fn starts_with(self, prefix: impl Into<SecondarySource<E>>) -> IteratorPipeline<bool>
  where
    E: PartialEq, {
    self.aggregate_with(prefix.into(), StartsWithLogic::new())
  }

  /// Answers whether the elements end with `suffix`.
  #[must_use]
  pub fn ends_with(self, suffix: impl Into<SecondarySource<E>>) -> IteratorPipeline<bool>
  where
    E: PartialEq, {
    self.aggregate_with(suffix.into(), EndsWithLogic::new())
  }

  /// Answers whether `needle` occurs contiguously.
  #[must_use]
  pub fn includes_slice(self, needle: impl Into<SecondarySource<E>>) -> IteratorPipeline<bool>
  where
    E: PartialEq, {
    self.aggregate_with(needle.into(), IncludesSliceLogic::new())
  }

  /// Answers whether every element of `required` occurs, in any order.
  #[must_use]
  pub fn includes_all(self, required: impl Into<SecondarySource<E>>) -> IteratorPipeline<bool>
  where
    E: Eq + Hash, {
    self.aggregate_with(required.into(), IncludesAllLogic::new())
  }

  /// Finds the start of the first occurrence of `needle`.
  #[must_use]
  pub fn find_index_of_slice(self, needle: impl Into<SecondarySource<E>>) -> IteratorPipeline<usize>
  where
    E: PartialEq, {
    self.aggregate_with(needle.into(), FindIndexOfSliceLogic::new())
  }

  /// Finds the start of the last occurrence of `needle`.
  #[must_use]
  pub fn find_last_index_of_slice(self, needle: impl Into<SecondarySource<E>>) -> IteratorPipeline<usize>
  where
    E: PartialEq, {
    self.aggregate_with(needle.into(), FindLastIndexOfSliceLogic::new())
  }
}
