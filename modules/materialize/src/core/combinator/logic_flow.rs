/// Whether a combinator logic wants more upstream elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicFlow {
  /// Keep pulling.
  Continue,
  /// Stop pulling; the upstream is treated as exhausted.
  Stop,
}
