use crate::core::MaterializeError;

/// One call of the indexed protocol, as seen by closure-backed callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexedEvent<P> {
  /// An element was produced.
  Next {
    /// Advisory total size.
    size:    Option<usize>,
    /// Position of the element.
    index:   usize,
    /// The element.
    element: P,
  },
  /// The sequence ended with `size` elements.
  Complete {
    /// Total element count.
    size: usize,
  },
  /// The sequence failed.
  Error(MaterializeError),
}
