use alloc::vec;

use super::FindLastIndexOfSliceLogic;
use crate::core::combinator::AggregateLogic;

#[test]
fn reports_last_occurrence() {
  let mut logic = FindLastIndexOfSliceLogic::new();
  logic.prepare(vec![1_u32, 2]);
  for (index, value) in [1, 2, 3, 1, 2, 4].into_iter().enumerate() {
    logic.apply(index, value).unwrap();
  }
  assert_eq!(logic.finish().unwrap(), Some(3));
}

#[test]
fn empty_needle_is_found_at_the_end() {
  let mut logic = FindLastIndexOfSliceLogic::new();
  logic.prepare(vec![]);
  for (index, value) in [5_u32, 6, 7].into_iter().enumerate() {
    logic.apply(index, value).unwrap();
  }
  assert_eq!(logic.finish().unwrap(), Some(3));
}

#[test]
fn missing_needle_has_no_result() {
  let mut logic = FindLastIndexOfSliceLogic::new();
  logic.prepare(vec![9_u32]);
  logic.apply(0, 1).unwrap();
  assert_eq!(logic.finish().unwrap(), None);
}
