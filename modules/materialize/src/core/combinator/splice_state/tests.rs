use alloc::{sync::Arc, vec, vec::Vec};

use super::SpliceState;
use crate::core::{
  CancelSignal, MaterializeError,
  callback::IndexedEvent,
  iterator::{
    IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer, StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe, collect_elements},
};

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

fn splice(
  upstream: SharedIteratorMaterializer<u32>,
  position: usize,
  inserted: SharedIteratorMaterializer<u32>,
) -> StatefulIteratorMaterializer<u32> {
  StatefulIteratorMaterializer::new(CancelSignal::new(), SpliceState::new(upstream, position, inserted))
}

#[test]
fn inserts_after_the_position() {
  let machine = splice(list(vec![1, 2, 3]), 1, list(vec![9, 8]));
  assert_eq!(machine.known_size(), Some(5));
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.elements(), [1, 9, 8, 2, 3]);
  assert_eq!(probe.indices(), [0, 1, 2, 3, 4]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 5 }));
}

#[test]
fn position_zero_inserts_in_front() {
  let machine = splice(list(vec![1, 2]), 0, list(vec![9]));
  assert_eq!(collect_elements(&machine), Some(Ok(vec![9, 1, 2])));
}

#[test]
fn short_upstream_gets_the_sequence_appended() {
  let machine = splice(list(vec![1]), 5, list(vec![9]));
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.elements(), [1, 9]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 2 }));
}

#[test]
fn skip_crosses_the_splice_point() {
  let machine = splice(list(vec![1, 2, 3]), 1, list(vec![9, 8]));
  let skipped = ResultProbe::new();
  machine.materialize_skip(2, skipped.consumer());
  assert_eq!(skipped.take(), Some(Ok(2)));

  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.elements(), [8]);
  assert_eq!(next.indices(), [2]);
}

#[test]
fn materializes_at_once_only_when_both_sources_do() {
  let parked = ParkedState::new();
  let inserted = StatefulIteratorMaterializer::new(CancelSignal::new(), parked).shared();
  assert!(!splice(list(vec![1]), 0, inserted).is_materialized_at_once());
  assert!(splice(list(vec![1]), 0, list(vec![2])).is_materialized_at_once());
}

#[test]
fn cancel_reaches_both_sources() {
  let upstream = ParkedState::new();
  let inserted = ParkedState::new();
  let machine = splice(
    StatefulIteratorMaterializer::new(CancelSignal::new(), upstream.clone()).shared(),
    2,
    StatefulIteratorMaterializer::new(CancelSignal::new(), inserted.clone()).shared(),
  );
  let probe = EventProbe::new();
  machine.materialize_next(probe.consumer());
  assert_eq!(upstream.pending(), 1);

  machine.materialize_cancel(MaterializeError::cancelled("stop"));
  assert_eq!(upstream.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(inserted.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(probe.events(), [IndexedEvent::Error(MaterializeError::cancelled("stop"))]);
  assert!(machine.is_cancelled());
}

#[test]
fn concurrent_elements_callers_receive_the_same_list() {
  let upstream = ParkedState::new();
  let upstream_machine = StatefulIteratorMaterializer::new(CancelSignal::new(), upstream.clone());
  let machine = splice(upstream_machine.shared(), 2, list(vec![9]));
  let first = ResultProbe::new();
  let second = ResultProbe::new();
  machine.materialize_elements(first.consumer());
  machine.materialize_elements(second.consumer());
  assert_eq!(upstream.pending(), 1);

  assert!(upstream_machine.set_done(list(vec![1, 2, 3, 4])).is_ok());
  upstream.release(&upstream_machine);
  assert_eq!(first.take(), Some(Ok(vec![1, 2, 9, 3, 4])));
  assert_eq!(second.take(), Some(Ok(vec![1, 2, 9, 3, 4])));
  let after = EventProbe::new();
  machine.materialize_next(after.consumer());
  assert_eq!(after.events(), [IndexedEvent::Complete { size: 5 }]);
}

#[test]
fn elements_after_next_splice_at_the_remaining_offset() {
  let machine = splice(list(vec![1, 2, 3]), 2, list(vec![9]));
  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.elements(), [1]);

  assert_eq!(collect_elements(&machine), Some(Ok(vec![2, 9, 3])));
  let after = EventProbe::new();
  machine.materialize_next(after.consumer());
  assert_eq!(after.events(), [IndexedEvent::Complete { size: 4 }]);
}

#[test]
fn elements_of_a_short_upstream_end_with_the_sequence() {
  assert_eq!(collect_elements(&splice(list(vec![1]), 5, list(vec![9]))), Some(Ok(vec![1, 9])));
}
