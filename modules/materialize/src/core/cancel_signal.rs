use alloc::sync::Arc;

use spin::Once;

use super::MaterializeError;


/// Write-once cancellation cell shared by every materializer of a pipeline.
///
/// The first call to [`CancelSignal::cancel`] wins; every clone observes the stored error.
#[derive(Clone)]
pub struct CancelSignal {
  cell: Arc<Once<MaterializeError>>,
}

impl CancelSignal {
  /// Creates an empty signal.
  #[must_use]
  pub fn new() -> Self {
    Self { cell: Arc::new(Once::new()) }
  }

  /// Stores the cancellation error unless one is already present.
  ///
  /// Returns `true` when this call set the signal.
  pub fn cancel(&self, error: MaterializeError) -> bool {
    let mut stored = false;
    self.cell.call_once(|| {
      stored = true;
      error
    });
    stored
  }

  /// Returns `true` once the signal has been set.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.cell.is_completed()
  }

  /// Returns the stored cancellation error.
  #[must_use]
  pub fn error(&self) -> Option<MaterializeError> {
    self.cell.get().cloned()
  }

  /// Returns the stored cancellation in place of `error` when the signal is set.
  #[must_use]
  pub fn resolve(&self, error: MaterializeError) -> MaterializeError {
    self.error().unwrap_or(error)
  }
}

impl Default for CancelSignal {
  fn default() -> Self {
    Self::new()
  }
}

impl core::fmt::Debug for CancelSignal {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("CancelSignal").field("error", &self.cell.get()).finish()
  }
}
