use alloc::string::String;

#[cfg(test)]
mod tests;

/// Errors delivered through the materialization callback protocol.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum MaterializeError {
  /// Materialization was cancelled by an external request.
  #[error("materialization cancelled: {0}")]
  Cancelled(String),
  /// An upstream source failed.
  #[error("materialization failed: {0}")]
  Failed(String),
  /// A caller supplied callback failed while being invoked.
  #[error("callback failed: {0}")]
  CallbackFailed(String),
  /// The requested element does not exist.
  #[error("no such element")]
  NoSuchElement,
  /// A blocking wait would never be resumed because the caller owns the execution turn.
  #[error("blocking wait would deadlock the current execution context")]
  Deadlock,
  /// A scheduled task was interrupted before it could run.
  #[error("scheduled task interrupted")]
  Interrupted,
}

impl MaterializeError {
  /// Creates a cancellation error with the given reason.
  #[must_use]
  pub fn cancelled(reason: impl Into<String>) -> Self {
    Self::Cancelled(reason.into())
  }

  /// Creates an upstream failure with the given reason.
  #[must_use]
  pub fn failed(reason: impl Into<String>) -> Self {
    Self::Failed(reason.into())
  }

  /// Creates a callback failure with the given reason.
  #[must_use]
  pub fn callback_failed(reason: impl Into<String>) -> Self {
    Self::CallbackFailed(reason.into())
  }

  /// Returns `true` when the error represents a cancellation.
  #[must_use]
  pub const fn is_cancellation(&self) -> bool {
    matches!(self, Self::Cancelled(_) | Self::Interrupted)
  }
}
