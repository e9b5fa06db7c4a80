use alloc::{sync::Arc, vec};

use super::FreezeGate;
use crate::core::{
  CancelSignal,
  iterator::{ListToIteratorMaterializer, StatefulIteratorMaterializer, pending_request::PendingRequest},
  testing::{EventProbe, ParkedState, ResultProbe},
};

fn machine() -> StatefulIteratorMaterializer<u8> {
  StatefulIteratorMaterializer::new(CancelSignal::new(), ParkedState::new())
}

#[test]
fn only_the_first_submission_starts() {
  let machine = machine();
  let gate = FreezeGate::new();
  let first = EventProbe::new();
  let second = ResultProbe::new();
  assert!(gate.submit(&machine, PendingRequest::Next(first.consumer())));
  assert!(!gate.submit(&machine, PendingRequest::HasNext(second.consumer())));
  assert_eq!(gate.pending(), 2);

  gate.release(&machine);
  assert_eq!(gate.pending(), 2);

  assert!(machine.set_done(Arc::new(ListToIteratorMaterializer::new(vec![5]))).is_ok());
  gate.release(&machine);
  assert_eq!(gate.pending(), 0);
  assert_eq!(first.elements(), [5]);
  assert_eq!(second.take(), Some(Ok(false)));
}

#[test]
fn submission_after_freeze_is_answered_immediately() {
  let machine = machine();
  let gate = FreezeGate::new();
  assert!(machine.set_done(Arc::new(ListToIteratorMaterializer::new(vec![1, 2]))).is_ok());
  let skipped = ResultProbe::new();
  assert!(!gate.submit(&machine, PendingRequest::skip(5, skipped.consumer())));
  assert_eq!(skipped.take(), Some(Ok(2)));
  assert_eq!(gate.pending(), 0);
}
