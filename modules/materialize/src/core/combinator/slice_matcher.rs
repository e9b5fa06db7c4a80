use alloc::{collections::VecDeque, vec::Vec};


/// Streaming needle search over a haystack fed one element at a time.
///
/// The window always holds the longest suffix of the haystack seen so far that is also a proper
/// prefix of the needle, so the haystack itself is never buffered. The needle must not be empty.
pub(crate) struct SliceMatcher<E> {
  needle:   Vec<E>,
  window:   VecDeque<E>,
  consumed: usize,
}

impl<E: PartialEq> SliceMatcher<E> {
  pub(crate) const fn new() -> Self {
    Self { needle: Vec::new(), window: VecDeque::new(), consumed: 0 }
  }

  pub(crate) fn set_needle(&mut self, needle: Vec<E>) {
    self.window = VecDeque::with_capacity(needle.len());
    self.needle = needle;
  }

  pub(crate) fn is_needle_empty(&self) -> bool {
    self.needle.is_empty()
  }

  /// Number of haystack elements pushed so far.
  pub(crate) const fn consumed(&self) -> usize {
    self.consumed
  }

  /// Feeds the next haystack element; returns the start index of a match ending at it.
  pub(crate) fn push(&mut self, element: E) -> Option<usize> {
    self.consumed += 1;
    self.window.push_back(element);
    self.shrink();
    if self.needle.is_empty() || self.window.len() < self.needle.len() {
      return None;
    }
    let start = self.consumed - self.needle.len();
    // slide by one and keep looking for overlapping matches
    self.window.pop_front();
    self.shrink();
    Some(start)
  }

  fn shrink(&mut self) {
    while !self.window.is_empty() && !self.is_prefix() {
      self.window.pop_front();
    }
  }

  fn is_prefix(&self) -> bool {
    self.window.len() <= self.needle.len() && self.window.iter().zip(&self.needle).all(|(left, right)| left == right)
  }
}
