use alloc::{collections::VecDeque, vec, vec::Vec};

use super::DiffLogic;
use crate::core::combinator::TransformLogic;

#[test]
fn subtracts_as_multiset_preserving_order() {
  let mut logic = DiffLogic::new();
  logic.prepare(vec!['a']);
  let mut output = VecDeque::new();
  for (index, value) in ['a', 'a', 'b'].into_iter().enumerate() {
    logic.apply(index, value, &mut output).unwrap();
  }
  assert_eq!(output.into_iter().collect::<Vec<_>>(), ['a', 'b']);
}

#[test]
fn exhausted_bag_reports_upstream_size() {
  let mut logic = DiffLogic::new();
  logic.prepare(vec![1_u8]);
  assert_eq!(logic.remaining(Some(3)), None);
  let mut output = VecDeque::new();
  logic.apply(0, 1, &mut output).unwrap();
  assert_eq!(logic.remaining(Some(2)), Some(2));
}
