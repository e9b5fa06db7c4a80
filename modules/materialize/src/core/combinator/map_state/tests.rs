use alloc::{format, string::String, sync::Arc, vec, vec::Vec};

use super::MapState;
use crate::core::{
  CancelSignal, MaterializeError,
  callback::IndexedEvent,
  iterator::{
    IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer, StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe},
};

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

fn label(index: usize, value: u32) -> String {
  format!("{index}:{value}")
}

#[test]
fn maps_with_upstream_indices_and_keeps_the_size() {
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), MapState::new(list(vec![10, 20, 30]), label));
  assert_eq!(machine.known_size(), Some(3));
  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.events(), [IndexedEvent::Next { size: Some(3), index: 0, element: String::from("0:10") }]);

  let rest = ResultProbe::new();
  machine.materialize_elements(rest.consumer());
  assert_eq!(rest.take(), Some(Ok(vec![String::from("1:20"), String::from("2:30")])));
  assert!(machine.is_succeeded());

  let done = EventProbe::<String>::new();
  machine.materialize_next(done.consumer());
  assert_eq!(done.events(), [IndexedEvent::Complete { size: 3 }]);
}

#[test]
fn skip_advances_the_mapped_indices() {
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), MapState::new(list(vec![1, 2, 3, 4]), label));
  let skipped = ResultProbe::new();
  machine.materialize_skip(2, skipped.consumer());
  assert_eq!(skipped.take(), Some(Ok(2)));
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.elements(), [String::from("2:3"), String::from("3:4")]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 4 }));
}

#[test]
fn upstream_failure_fails_the_map() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), MapState::new(upstream.shared(), label));
  let next = EventProbe::<String>::new();
  machine.materialize_next(next.consumer());
  upstream.set_failed(MaterializeError::failed("read"));
  parked.release(&upstream);
  assert_eq!(next.events(), [IndexedEvent::Error(MaterializeError::failed("read"))]);
  assert!(machine.is_failed());
}

#[test]
fn cancel_is_forwarded_upstream() {
  let cancel = CancelSignal::new();
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(cancel.clone(), parked.clone());
  let machine = StatefulIteratorMaterializer::new(cancel, MapState::new(upstream.shared(), label));
  let has_next = ResultProbe::new();
  machine.materialize_has_next(has_next.consumer());
  machine.materialize_cancel(MaterializeError::cancelled("user"));
  assert_eq!(has_next.take(), Some(Err(MaterializeError::cancelled("user"))));
  assert!(machine.is_cancelled());
  assert!(upstream.is_cancelled());
}

#[test]
fn concurrent_elements_callers_share_one_batch() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), MapState::new(upstream.shared(), label));
  let first = ResultProbe::new();
  let second = ResultProbe::new();
  machine.materialize_elements(first.consumer());
  machine.materialize_elements(second.consumer());
  assert_eq!(parked.pending(), 1);

  assert!(upstream.set_done(list(vec![1, 2, 3])).is_ok());
  parked.release(&upstream);
  let expected = vec![String::from("0:1"), String::from("1:2"), String::from("2:3")];
  assert_eq!(first.take(), Some(Ok(expected.clone())));
  assert_eq!(second.take(), Some(Ok(expected)));
  let after = EventProbe::<String>::new();
  machine.materialize_next(after.consumer());
  assert_eq!(after.events(), [IndexedEvent::Complete { size: 3 }]);
}

#[test]
fn a_failed_batch_fails_every_elements_caller() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), MapState::new(upstream.shared(), label));
  let first = ResultProbe::<Vec<String>>::new();
  let second = ResultProbe::<Vec<String>>::new();
  machine.materialize_elements(first.consumer());
  machine.materialize_elements(second.consumer());

  upstream.set_failed(MaterializeError::failed("read"));
  parked.release(&upstream);
  assert_eq!(first.take(), Some(Err(MaterializeError::failed("read"))));
  assert_eq!(second.take(), Some(Err(MaterializeError::failed("read"))));
}
