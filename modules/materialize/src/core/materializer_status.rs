use core::sync::atomic::Ordering;

use portable_atomic::AtomicU8;

#[cfg(test)]
mod tests;

/// Lifecycle status of a materializer.
///
/// The status starts at [`MaterializerStatus::Running`] and moves at most once to one of the
/// terminal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MaterializerStatus {
  /// Materialization is in progress.
  Running   = 0,
  /// Materialization completed successfully.
  Done      = 1,
  /// Materialization failed.
  Failed    = 2,
  /// Materialization was cancelled.
  Cancelled = 3,
}

impl MaterializerStatus {
  /// Returns the raw representation.
  #[must_use]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  /// Decodes a raw representation.
  #[must_use]
  pub const fn from_u8(value: u8) -> Self {
    match value {
      | 0 => Self::Running,
      | 1 => Self::Done,
      | 2 => Self::Failed,
      // only values produced by `as_u8` are ever stored
      | _ => Self::Cancelled,
    }
  }

  /// Returns `true` for every status other than [`MaterializerStatus::Running`].
  #[must_use]
  pub const fn is_terminal(self) -> bool {
    !matches!(self, Self::Running)
  }

  pub(crate) fn load(atomic: &AtomicU8) -> Self {
    Self::from_u8(atomic.load(Ordering::Acquire))
  }

  pub(crate) fn compare_exchange(expected: Self, desired: Self, atomic: &AtomicU8) -> Result<Self, Self> {
    let result = atomic.compare_exchange(expected.as_u8(), desired.as_u8(), Ordering::AcqRel, Ordering::Acquire);
    result.map(Self::from_u8).map_err(Self::from_u8)
  }
}
