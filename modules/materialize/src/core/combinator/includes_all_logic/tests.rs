use alloc::vec;

use super::IncludesAllLogic;
use crate::core::combinator::{AggregateLogic, LogicFlow};

#[test]
fn stops_once_every_element_was_seen() {
  let mut logic = IncludesAllLogic::new();
  logic.prepare(vec![3_u32, 1, 3]);
  assert_eq!(logic.apply(0, 1).unwrap(), LogicFlow::Continue);
  assert_eq!(logic.apply(1, 2).unwrap(), LogicFlow::Continue);
  assert_eq!(logic.apply(2, 3).unwrap(), LogicFlow::Stop);
  assert_eq!(logic.finish().unwrap(), Some(true));
}

#[test]
fn reports_missing_elements() {
  let mut logic = IncludesAllLogic::new();
  logic.prepare(vec![1_u32, 4]);
  logic.apply(0, 1).unwrap();
  assert_eq!(logic.finish().unwrap(), Some(false));
}

#[test]
fn empty_requirement_is_settled() {
  let mut logic = IncludesAllLogic::<u32>::new();
  logic.prepare(vec![]);
  assert!(logic.is_settled());
}
