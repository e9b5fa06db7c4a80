use alloc::{sync::Arc, vec, vec::Vec};

use super::ConcatState;
use crate::core::{
  CancelSignal, MaterializeError,
  callback::IndexedEvent,
  iterator::{
    FailedIteratorMaterializer, IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer,
    StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe, collect_elements},
};

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

fn parked(state: &ParkedState<u32>) -> SharedIteratorMaterializer<u32> {
  StatefulIteratorMaterializer::new(CancelSignal::new(), state.clone()).shared()
}

fn concat(state: ConcatState<u32>) -> StatefulIteratorMaterializer<u32> {
  StatefulIteratorMaterializer::new(CancelSignal::new(), state)
}

#[test]
fn append_continues_indices_into_the_tail() {
  let machine = concat(ConcatState::append(list(vec![1, 2]), list(vec![3, 4])));
  assert_eq!(machine.known_size(), Some(4));
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.elements(), [1, 2, 3, 4]);
  assert_eq!(probe.indices(), [0, 1, 2, 3]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 4 }));
  assert!(machine.is_succeeded());
}

#[test]
fn insert_all_places_the_inserted_sequence_first() {
  let machine = concat(ConcatState::insert_all(list(vec![9]), list(vec![1, 2])));
  assert_eq!(collect_elements(&machine), Some(Ok(vec![9, 1, 2])));
}

#[test]
fn known_size_saturates_and_stays_unknown_when_either_side_is() {
  let huge = ParkedState::with_known_size(Some(usize::MAX));
  let machine = concat(ConcatState::append(parked(&huge), list(vec![1])));
  assert_eq!(machine.known_size(), Some(usize::MAX));

  let unknown = ParkedState::new();
  let machine = concat(ConcatState::append(list(vec![1]), parked(&unknown)));
  assert_eq!(machine.known_size(), None);
}

#[test]
fn append_follows_the_leading_source_while_insert_all_needs_both() {
  let tail = ParkedState::new();
  assert!(concat(ConcatState::append(list(vec![1]), parked(&tail))).is_materialized_at_once());
  assert!(!concat(ConcatState::insert_all(list(vec![1]), parked(&tail))).is_materialized_at_once());
  assert!(concat(ConcatState::insert_all(list(vec![1]), list(vec![2]))).is_materialized_at_once());
}

#[test]
fn skip_crosses_into_the_tail() {
  let machine = concat(ConcatState::append(list(vec![1, 2]), list(vec![3, 4])));
  let skipped = ResultProbe::new();
  machine.materialize_skip(3, skipped.consumer());
  assert_eq!(skipped.take(), Some(Ok(3)));

  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.elements(), [4]);
  assert_eq!(next.indices(), [3]);
}

#[test]
fn has_next_asks_the_tail_once_the_leading_source_is_empty() {
  let machine = concat(ConcatState::append(list(Vec::new()), list(vec![5])));
  let probe = ResultProbe::new();
  machine.materialize_has_next(probe.consumer());
  assert_eq!(probe.take(), Some(Ok(true)));
}

#[test]
fn leading_failure_fails_the_combinator() {
  let failed: SharedIteratorMaterializer<u32> =
    Arc::new(FailedIteratorMaterializer::new(MaterializeError::failed("boom")));
  let machine = concat(ConcatState::append(failed, list(vec![1])));
  let probe = EventProbe::new();
  machine.materialize_next(probe.consumer());
  assert_eq!(probe.events(), [IndexedEvent::Error(MaterializeError::failed("boom"))]);
  assert!(machine.is_failed());
}

#[test]
fn cancel_reaches_both_sources() {
  let first = ParkedState::new();
  let second = ParkedState::new();
  let machine = concat(ConcatState::append(parked(&first), parked(&second)));
  let probe = EventProbe::new();
  machine.materialize_next(probe.consumer());
  assert_eq!(first.pending(), 1);

  machine.materialize_cancel(MaterializeError::cancelled("stop"));
  assert_eq!(first.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(second.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(probe.events(), [IndexedEvent::Error(MaterializeError::cancelled("stop"))]);
  assert!(machine.is_cancelled());
}

fn settle(state: &ParkedState<u32>, machine: &StatefulIteratorMaterializer<u32>, elements: Vec<u32>) {
  assert!(machine.set_done(list(elements)).is_ok());
  state.release(machine);
}

#[test]
fn concurrent_elements_callers_receive_the_same_list() {
  let head = ParkedState::new();
  let head_machine = StatefulIteratorMaterializer::new(CancelSignal::new(), head.clone());
  let machine = concat(ConcatState::append(head_machine.shared(), list(vec![9])));
  let first = ResultProbe::new();
  let second = ResultProbe::new();
  machine.materialize_elements(first.consumer());
  machine.materialize_elements(second.consumer());
  assert_eq!(head.pending(), 1);

  settle(&head, &head_machine, vec![1, 2, 3]);
  assert_eq!(first.take(), Some(Ok(vec![1, 2, 3, 9])));
  assert_eq!(second.take(), Some(Ok(vec![1, 2, 3, 9])));
  let after = EventProbe::new();
  machine.materialize_next(after.consumer());
  assert_eq!(after.events(), [IndexedEvent::Complete { size: 4 }]);
}

#[test]
fn callers_joining_while_the_trailing_source_is_pending_keep_the_prefix() {
  let tail = ParkedState::new();
  let tail_machine = StatefulIteratorMaterializer::new(CancelSignal::new(), tail.clone());
  let machine = concat(ConcatState::insert_all(list(vec![9]), tail_machine.shared()));
  let first = ResultProbe::new();
  machine.materialize_elements(first.consumer());
  assert_eq!(tail.pending(), 1);
  let second = ResultProbe::new();
  machine.materialize_elements(second.consumer());
  assert_eq!(tail.pending(), 1);
  assert!(!second.is_resolved());

  settle(&tail, &tail_machine, vec![1, 2, 3, 4]);
  assert_eq!(first.take(), Some(Ok(vec![9, 1, 2, 3, 4])));
  assert_eq!(second.take(), Some(Ok(vec![9, 1, 2, 3, 4])));
  assert!(machine.is_succeeded());
}
