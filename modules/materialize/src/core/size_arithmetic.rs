
/// Adds two known sizes, clamping on overflow.
///
/// The result is unknown (`None`) when either operand is unknown.
#[must_use]
pub const fn saturating_size_add(left: Option<usize>, right: Option<usize>) -> Option<usize> {
  match (left, right) {
    | (Some(left), Some(right)) => Some(left.saturating_add(right)),
    | _ => None,
  }
}

/// Adds two operation weights, clamping on overflow.
#[must_use]
pub const fn saturating_weight_add(left: usize, right: usize) -> usize {
  left.saturating_add(right)
}

/// Translates a total size hint expressed against `from_index` into one expressed against
/// `to_index`.
///
/// Used when a materializer renumbers the indices of the elements it forwards.
#[must_use]
pub const fn shift_size(size: Option<usize>, from_index: usize, to_index: usize) -> Option<usize> {
  match size {
    | Some(size) => Some(size.saturating_sub(from_index).saturating_add(to_index)),
    | None => None,
  }
}
