use super::MaxLogic;
use crate::core::combinator::AggregateLogic;

#[test]
fn first_maximum_wins() {
  let mut logic = MaxLogic::new(|left: &(u32, char), right: &(u32, char)| left.0.cmp(&right.0));
  for (index, value) in [(1, 'a'), (3, 'b'), (2, 'c'), (3, 'd')].into_iter().enumerate() {
    logic.apply(index, value).unwrap();
  }
  assert_eq!(logic.finish().unwrap(), Some((3, 'b')));
}

#[test]
fn min_keeps_least_element() {
  let mut logic = MaxLogic::min(|left: &u32, right: &u32| left.cmp(right));
  for (index, value) in [4, 2, 7, 2].into_iter().enumerate() {
    logic.apply(index, value).unwrap();
  }
  assert_eq!(logic.finish().unwrap(), Some(2));
}

#[test]
fn empty_upstream_has_no_result() {
  let mut logic = MaxLogic::new(|left: &u32, right: &u32| left.cmp(right));
  assert_eq!(logic.finish().unwrap(), None);
}
