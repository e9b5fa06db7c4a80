use core::num::NonZeroUsize;


/// Default weight a task may consume before yielding.
pub const DEFAULT_MIN_THROUGHPUT: usize = 64;

/// Configuration for execution contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContextConfig {
  name:           &'static str,
  min_throughput: NonZeroUsize,
}

impl ExecutionContextConfig {
  /// Creates a configuration with defaults.
  #[must_use]
  pub const fn new() -> Self {
    Self { name: "materialize", min_throughput: NonZeroUsize::MIN.saturating_add(DEFAULT_MIN_THROUGHPUT - 1) }
  }

  /// Returns the context name used in log events.
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.name
  }

  /// Returns the weight a task may consume before yielding.
  #[must_use]
  pub const fn min_throughput(&self) -> usize {
    self.min_throughput.get()
  }

  /// Updates the context name.
  #[must_use]
  pub const fn with_name(mut self, name: &'static str) -> Self {
    self.name = name;
    self
  }

  /// Updates the minimum throughput.
  #[must_use]
  pub const fn with_min_throughput(mut self, min_throughput: NonZeroUsize) -> Self {
    self.min_throughput = min_throughput;
    self
  }
}

impl Default for ExecutionContextConfig {
  fn default() -> Self {
    Self::new()
  }
}
