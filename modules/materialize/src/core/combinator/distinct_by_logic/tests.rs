use alloc::{collections::VecDeque, vec::Vec};

use super::DistinctByLogic;
use crate::core::combinator::TransformLogic;

#[test]
fn keeps_first_occurrence_of_each_key() {
  let mut logic = DistinctByLogic::new(|value: &&str| value.len());
  let mut output = VecDeque::new();
  for (index, value) in ["a", "bb", "c", "dd", "eee"].into_iter().enumerate() {
    logic.apply(index, value, &mut output).unwrap();
  }
  assert_eq!(output.into_iter().collect::<Vec<_>>(), ["a", "bb", "eee"]);
}
