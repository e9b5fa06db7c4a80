use alloc::{boxed::Box, vec, vec::Vec};

use super::ElementsCollector;
use crate::core::{
  MaterializeError,
  callback::IndexedFuturePredicate,
  iterator::{IteratorMaterializer, ListToIteratorMaterializer},
  testing::ResultProbe,
};

#[test]
fn hands_every_offered_element_to_the_consumer_on_complete() {
  let probe = ResultProbe::new();
  let list = ListToIteratorMaterializer::new(vec![3, 1, 2]);
  list.materialize_next_while(Box::new(ElementsCollector::new(probe.consumer())));
  assert_eq!(probe.take(), Some(Ok(vec![3, 1, 2])));
  assert_eq!(probe.calls(), 1);
}

#[test]
fn forwards_errors_once() {
  let probe = ResultProbe::<Vec<u8>>::new();
  let mut collector = ElementsCollector::new(probe.consumer());
  assert_eq!(collector.test(Some(usize::MAX), 0, 1), Ok(true));
  collector.error(MaterializeError::failed("upstream"));
  collector.error(MaterializeError::failed("again"));
  assert_eq!(probe.take(), Some(Err(MaterializeError::failed("upstream"))));
  assert_eq!(probe.calls(), 1);
}
