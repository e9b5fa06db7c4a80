use alloc::vec::Vec;

use super::EmptyIteratorMaterializer;
use crate::core::{
  MaterializerStatus,
  callback::IndexedEvent,
  iterator::IteratorMaterializer,
  testing::{EventProbe, ResultProbe},
};

#[test]
fn exhausted_reports_the_count_it_was_created_with() {
  let empty = EmptyIteratorMaterializer::exhausted(3);
  let probe = EventProbe::<u8>::new();
  empty.materialize_next(probe.consumer());
  assert_eq!(probe.events(), [IndexedEvent::Complete { size: 3 }]);

  let predicate = EventProbe::<u8>::new();
  empty.materialize_next_while(predicate.predicate(None));
  assert_eq!(predicate.events(), [IndexedEvent::Complete { size: 3 }]);
}

#[test]
fn answers_every_operation_as_done() {
  let empty = EmptyIteratorMaterializer::new();
  assert_eq!(IteratorMaterializer::<u8>::known_size(&empty), Some(0));
  assert_eq!(IteratorMaterializer::<u8>::status(&empty), MaterializerStatus::Done);
  assert!(IteratorMaterializer::<u8>::is_succeeded(&empty));

  let elements = ResultProbe::<Vec<u8>>::new();
  empty.materialize_elements(elements.consumer());
  assert_eq!(elements.take(), Some(Ok(Vec::new())));

  let has_next = ResultProbe::new();
  IteratorMaterializer::<u8>::materialize_has_next(&empty, has_next.consumer());
  assert_eq!(has_next.take(), Some(Ok(false)));

  let skipped = ResultProbe::new();
  IteratorMaterializer::<u8>::materialize_skip(&empty, 5, skipped.consumer());
  assert_eq!(skipped.take(), Some(Ok(0)));
}
