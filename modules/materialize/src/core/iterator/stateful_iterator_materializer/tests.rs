use alloc::{sync::Arc, vec, vec::Vec};

use super::StatefulIteratorMaterializer;
use crate::core::{
  CancelSignal, MaterializeError, MaterializerStatus,
  callback::IndexedEvent,
  iterator::{IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer},
  testing::{EventProbe, ParkedState, ResultProbe},
};

fn parked(known_size: Option<usize>) -> (StatefulIteratorMaterializer<u32>, ParkedState<u32>) {
  let state = ParkedState::with_known_size(known_size);
  (StatefulIteratorMaterializer::new(CancelSignal::new(), state.clone()), state)
}

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

#[test]
fn delegates_to_state_until_frozen_then_replays_in_order() {
  let (machine, state) = parked(Some(3));
  assert_eq!(machine.known_size(), Some(3));
  assert!(!machine.is_materialized_at_once());
  assert_eq!(machine.status(), MaterializerStatus::Running);

  let next = EventProbe::new();
  let rest = ResultProbe::new();
  machine.materialize_next(next.consumer());
  machine.materialize_elements(rest.consumer());
  assert_eq!(state.pending(), 2);
  assert!(next.is_empty());

  assert!(machine.set_done(list(vec![1, 2, 3])).is_ok());
  state.release(&machine);
  assert_eq!(next.elements(), [1]);
  assert_eq!(rest.take(), Some(Ok(vec![2, 3])));
  assert!(machine.is_succeeded());
  assert!(machine.is_materialized_at_once());
}

#[test]
fn first_transition_wins() {
  let (machine, _state) = parked(None);
  let frozen = list(vec![9]);
  assert!(machine.set_done(frozen.clone()).is_ok());
  let loser = machine.set_done(list(vec![1, 2]));
  assert!(matches!(loser, Err(current) if Arc::ptr_eq(&current, &frozen)));
  let after_failure = machine.set_failed(MaterializeError::failed("late"));
  assert!(Arc::ptr_eq(&after_failure, &frozen));
  assert_eq!(machine.status(), MaterializerStatus::Done);
  assert_eq!(machine.frozen_state().map(|state| state.known_size()), Some(Some(1)));
}

#[test]
fn cancellation_takes_precedence_over_failure() {
  let (machine, _state) = parked(None);
  assert!(machine.cancel_signal().cancel(MaterializeError::cancelled("user")));
  machine.set_failed(MaterializeError::failed("io"));
  assert_eq!(machine.status(), MaterializerStatus::Cancelled);
  let next = EventProbe::<u32>::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.events(), [IndexedEvent::Error(MaterializeError::cancelled("user"))]);
}

#[test]
fn failure_without_cancellation_freezes_failed() {
  let (machine, _state) = parked(None);
  assert_eq!(machine.fail_with(MaterializeError::failed("io")), MaterializeError::failed("io"));
  assert!(machine.is_failed());
  let has_next = ResultProbe::new();
  machine.materialize_has_next(has_next.consumer());
  assert_eq!(has_next.take(), Some(Err(MaterializeError::failed("io"))));
}

#[test]
fn cancel_reaches_state_and_releases_waiters() {
  let (machine, state) = parked(None);
  let has_next = ResultProbe::new();
  machine.materialize_has_next(has_next.consumer());
  machine.materialize_cancel(MaterializeError::cancelled("stop"));
  assert_eq!(state.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(has_next.take(), Some(Err(MaterializeError::cancelled("stop"))));
  assert!(machine.is_cancelled());

  machine.materialize_cancel(MaterializeError::cancelled("again"));
  assert_eq!(state.cancellations().len(), 1);
  assert_eq!(machine.cancel_signal().error(), Some(MaterializeError::cancelled("stop")));
}
