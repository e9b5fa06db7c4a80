use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use super::{accept, accept_indexed, complete_indexed, complete_predicate, test_indexed};
use crate::core::{
  MaterializeError,
  callback::{FnFutureConsumer, FnIndexedFutureConsumer, FnIndexedFuturePredicate, IndexedEvent},
};

#[test]
fn failing_accept_is_redirected_to_error() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  let mut consumer = FnFutureConsumer::boxed(move |result: Result<u32, MaterializeError>| {
    sink.lock().push(result.clone());
    match result {
      | Ok(_) => Err(MaterializeError::callback_failed("rejected")),
      | Err(_) => Ok(()),
    }
  });
  accept(consumer.as_mut(), 7);
  assert_eq!(*seen.lock(), [Ok(7), Err(MaterializeError::callback_failed("rejected"))]);
}

#[test]
fn failing_indexed_accept_reports_stop() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  let mut consumer = FnIndexedFutureConsumer::boxed(move |event: IndexedEvent<u32>| {
    let reject = matches!(event, IndexedEvent::Next { .. });
    sink.lock().push(event);
    if reject { Err(MaterializeError::callback_failed("no")) } else { Ok(()) }
  });
  assert!(!accept_indexed(consumer.as_mut(), Some(1), 0, 5));
  complete_indexed(consumer.as_mut(), 1);
  let seen = seen.lock();
  assert_eq!(seen[1], IndexedEvent::Error(MaterializeError::callback_failed("no")));
  assert_eq!(seen[2], IndexedEvent::Complete { size: 1 });
}

#[test]
fn failing_predicate_stops_iteration() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  let mut predicate = FnIndexedFuturePredicate::boxed(move |event: IndexedEvent<u32>| {
    sink.lock().push(event.clone());
    match event {
      | IndexedEvent::Next { element: 2, .. } => Err(MaterializeError::callback_failed("two")),
      | _ => Ok(true),
    }
  });
  assert!(test_indexed(predicate.as_mut(), None, 0, 1));
  assert!(!test_indexed(predicate.as_mut(), None, 1, 2));
  complete_predicate(predicate.as_mut(), 2);
  assert_eq!(seen.lock()[2], IndexedEvent::Error(MaterializeError::callback_failed("two")));
}
