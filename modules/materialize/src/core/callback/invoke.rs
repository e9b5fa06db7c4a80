//! Call-boundary helpers.
//!
//! Producers never let a callback failure escape to the caller of a `materialize_*` operation:
//! the failure is logged and delivered to the error path of the callback that raised it.

use super::{FutureConsumer, IndexedFutureConsumer, IndexedFuturePredicate};
use crate::core::{LOG_TARGET, MaterializeError};

#[cfg(test)]
mod tests;

fn redirect(error: &MaterializeError, callback: &'static str) {
  tracing::warn!(target: LOG_TARGET, %error, callback, "callback failed; redirecting to its error path");
}

/// Delivers `value`, redirecting a failure to the consumer's error path.
pub(crate) fn accept<P>(consumer: &mut dyn FutureConsumer<P>, value: P) {
  if let Err(error) = consumer.accept(value) {
    redirect(&error, "accept");
    consumer.error(error);
  }
}

/// Delivers one indexed element. Returns `false` when the consumer failed.
pub(crate) fn accept_indexed<P>(
  consumer: &mut dyn IndexedFutureConsumer<P>,
  size: Option<usize>,
  index: usize,
  element: P,
) -> bool {
  match consumer.accept(size, index, element) {
    | Ok(()) => true,
    | Err(error) => {
      redirect(&error, "accept");
      consumer.error(error);
      false
    },
  }
}

/// Signals completion to an indexed consumer.
pub(crate) fn complete_indexed<P>(consumer: &mut dyn IndexedFutureConsumer<P>, size: usize) {
  if let Err(error) = consumer.complete(size) {
    redirect(&error, "complete");
    consumer.error(error);
  }
}

/// Tests one element. A failing predicate is treated as having asked to stop.
pub(crate) fn test_indexed<P>(
  predicate: &mut dyn IndexedFuturePredicate<P>,
  size: Option<usize>,
  index: usize,
  element: P,
) -> bool {
  match predicate.test(size, index, element) {
    | Ok(more) => more,
    | Err(error) => {
      redirect(&error, "test");
      predicate.error(error);
      false
    },
  }
}

/// Signals completion to an indexed predicate.
pub(crate) fn complete_predicate<P>(predicate: &mut dyn IndexedFuturePredicate<P>, size: usize) {
  if let Err(error) = predicate.complete(size) {
    redirect(&error, "complete");
    predicate.error(error);
  }
}
