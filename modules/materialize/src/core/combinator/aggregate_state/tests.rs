use alloc::{sync::Arc, vec, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

use super::AggregateState;
use crate::core::{
  CancelSignal, MaterializeError,
  callback::IndexedEvent,
  combinator::{CountLogic, FindFirstLogic, FindIndexLogic, MaxLogic, SecondarySource, StartsWithLogic},
  iterator::{
    CollectionToIteratorMaterializer, IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer,
    StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe},
};

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

#[test]
fn realizes_a_single_element_result() {
  let machine =
    StatefulIteratorMaterializer::new(CancelSignal::new(), AggregateState::new(list(vec![4, 5, 6]), CountLogic::new()));
  assert_eq!(machine.known_size(), Some(1));
  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.events(), [IndexedEvent::Next { size: Some(1), index: 0, element: 3 }]);
  assert!(machine.is_succeeded());
}

#[test]
fn stops_pulling_once_settled() {
  let pulls = Arc::new(AtomicUsize::new(0));
  let counter = pulls.clone();
  let upstream: SharedIteratorMaterializer<u32> = Arc::new(CollectionToIteratorMaterializer::new((1..=10_u32).inspect(
    move |_| {
      counter.fetch_add(1, Ordering::Relaxed);
    },
  )));
  let state = AggregateState::new(upstream.clone(), FindFirstLogic::new(|_, value: &u32| *value > 2));
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), state);
  let result = ResultProbe::new();
  machine.materialize_elements(result.consumer());
  assert_eq!(result.take(), Some(Ok(vec![3])));
  assert_eq!(pulls.load(Ordering::Relaxed), 3);
  assert_eq!(upstream.known_size(), Some(7));
}

#[test]
fn not_found_realizes_an_empty_result() {
  let state = AggregateState::new(list(vec![1, 3, 5]), FindIndexLogic::new(|_, value: &u32| value % 2 == 0));
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), state);
  let next = EventProbe::<usize>::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.events(), [IndexedEvent::Complete { size: 0 }]);
  assert_eq!(machine.known_size(), Some(0));
}

#[test]
fn max_of_empty_upstream_is_empty() {
  let state = AggregateState::new(list(Vec::new()), MaxLogic::new(u32::cmp));
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), state);
  let elements = ResultProbe::new();
  machine.materialize_elements(elements.consumer());
  assert_eq!(elements.take(), Some(Ok(Vec::new())));
}

#[test]
fn secondary_is_prepared_before_the_upstream_is_read() {
  let state =
    AggregateState::with_secondary(list(vec![1, 2, 3]), SecondarySource::from(vec![1, 2]), StartsWithLogic::new());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), state);
  let elements = ResultProbe::new();
  machine.materialize_elements(elements.consumer());
  assert_eq!(elements.take(), Some(Ok(vec![true])));
}

#[test]
fn empty_secondary_settles_without_touching_the_upstream() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let state =
    AggregateState::with_secondary(upstream.shared(), SecondarySource::from(Vec::new()), StartsWithLogic::new());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), state);
  let elements = ResultProbe::new();
  machine.materialize_elements(elements.consumer());
  assert_eq!(elements.take(), Some(Ok(vec![true])));
  assert_eq!(parked.pending(), 0);
}

#[test]
fn waiting_requests_are_answered_in_order_once_settled() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let machine =
    StatefulIteratorMaterializer::new(CancelSignal::new(), AggregateState::new(upstream.shared(), CountLogic::new()));
  let has_next = ResultProbe::new();
  let next = EventProbe::new();
  machine.materialize_has_next(has_next.consumer());
  machine.materialize_next(next.consumer());
  assert_eq!(parked.pending(), 1);
  assert!(!has_next.is_resolved());

  assert!(upstream.set_done(list(vec![7, 8, 9])).is_ok());
  parked.release(&upstream);
  assert_eq!(has_next.take(), Some(Ok(true)));
  assert_eq!(next.elements(), [3]);
}

#[test]
fn cancel_reaches_upstream_and_waiters() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let machine =
    StatefulIteratorMaterializer::new(CancelSignal::new(), AggregateState::new(upstream.shared(), CountLogic::new()));
  let next = EventProbe::<usize>::new();
  machine.materialize_next(next.consumer());
  machine.materialize_cancel(MaterializeError::cancelled("stop"));
  assert_eq!(parked.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(next.events(), [IndexedEvent::Error(MaterializeError::cancelled("stop"))]);
  assert!(machine.is_cancelled());
}
