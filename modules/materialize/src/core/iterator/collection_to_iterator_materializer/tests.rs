use alloc::{vec, vec::Vec};

use super::CollectionToIteratorMaterializer;
use crate::core::{
  callback::IndexedEvent,
  iterator::IteratorMaterializer,
  testing::{EventProbe, ResultProbe, collect_elements},
};

#[test]
fn known_size_only_for_exact_size_hints() {
  let exact = CollectionToIteratorMaterializer::new(vec![1, 2, 3]);
  assert_eq!(exact.known_size(), Some(3));
  assert!(!exact.is_materialized_at_once());

  let filtered = CollectionToIteratorMaterializer::new((0..10).filter(|value| value % 3 == 0));
  assert_eq!(filtered.known_size(), None);
  assert_eq!(collect_elements(&filtered), Some(Ok(vec![0, 3, 6, 9])));
}

#[test]
fn unknown_size_is_reported_as_none_per_element() {
  let filtered = CollectionToIteratorMaterializer::new((0..4).filter(|value| value % 2 == 1));
  let probe = EventProbe::new();
  filtered.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.events(), [
    IndexedEvent::Next { size: None, index: 0, element: 1 },
    IndexedEvent::Next { size: None, index: 1, element: 3 },
    IndexedEvent::Complete { size: 2 },
  ]);
}

#[test]
fn skip_counts_only_existing_elements() {
  let collection = CollectionToIteratorMaterializer::new(0..3_u8);
  let skipped = ResultProbe::new();
  collection.materialize_skip(10, skipped.consumer());
  assert_eq!(skipped.take(), Some(Ok(3)));
  assert_eq!(collect_elements(&collection), Some(Ok(Vec::<u8>::new())));
}
