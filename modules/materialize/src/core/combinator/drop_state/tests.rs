use alloc::{sync::Arc, vec, vec::Vec};

use super::DropState;
use crate::core::{
  CancelSignal,
  callback::IndexedEvent,
  iterator::{
    IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer, StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe},
};

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

#[test]
fn renumbers_the_remainder_from_zero() {
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), DropState::new(list(vec![1, 2, 3, 4]), 2));
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.elements(), [3, 4]);
  assert_eq!(probe.indices(), [0, 1]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 2 }));
}

#[test]
fn concurrent_elements_callers_receive_the_same_list() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::new(CancelSignal::new(), parked.clone());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), DropState::new(upstream.shared(), 1));
  let first = ResultProbe::new();
  let second = ResultProbe::new();
  machine.materialize_elements(first.consumer());
  machine.materialize_elements(second.consumer());
  assert_eq!(parked.pending(), 1);

  assert!(upstream.set_done(list(vec![1, 2, 3])).is_ok());
  parked.release(&upstream);
  assert_eq!(first.take(), Some(Ok(vec![2, 3])));
  assert_eq!(second.take(), Some(Ok(vec![2, 3])));
}
