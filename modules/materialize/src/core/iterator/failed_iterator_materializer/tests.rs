use alloc::vec::Vec;

use super::FailedIteratorMaterializer;
use crate::core::{
  MaterializeError,
  callback::IndexedEvent,
  iterator::IteratorMaterializer,
  testing::{EventProbe, ResultProbe},
};

#[test]
fn every_operation_redelivers_the_same_error() {
  let error = MaterializeError::failed("disk");
  let failed = FailedIteratorMaterializer::new(error.clone());
  assert!(IteratorMaterializer::<u8>::is_failed(&failed));
  assert_eq!(IteratorMaterializer::<u8>::known_size(&failed), None);

  for _ in 0..2 {
    let elements = ResultProbe::<Vec<u8>>::new();
    failed.materialize_elements(elements.consumer());
    assert_eq!(elements.take(), Some(Err(error.clone())));
  }

  let next = EventProbe::<u8>::new();
  failed.materialize_next(next.consumer());
  assert_eq!(next.events(), [IndexedEvent::Error(error.clone())]);

  let skipped = ResultProbe::new();
  IteratorMaterializer::<u8>::materialize_skip(&failed, 1, skipped.consumer());
  assert_eq!(skipped.take(), Some(Err(error)));
}

#[test]
fn cancel_is_ignored() {
  let failed = FailedIteratorMaterializer::new(MaterializeError::NoSuchElement);
  IteratorMaterializer::<u8>::materialize_cancel(&failed, MaterializeError::cancelled("late"));
  assert_eq!(failed.error(), &MaterializeError::NoSuchElement);
  assert!(IteratorMaterializer::<u8>::is_failed(&failed));
}
