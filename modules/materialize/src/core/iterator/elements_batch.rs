use alloc::{boxed::Box, sync::Arc, vec::Vec};

use spin::Mutex;

use super::pending_request::ElementsFanOut;
use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, FutureConsumer},
};


type Waiting<E> = Arc<Mutex<Option<ElementsFanOut<E>>>>;

/// Single in-flight `materialize_elements` exchange of a combinator.
///
/// Callers arriving while an exchange runs join it instead of issuing another upstream request,
/// and every joined caller receives the list computed once for the batch.
pub(crate) struct ElementsBatch<E> {
  waiting: Waiting<E>,
}

impl<E: Clone + Send + 'static> ElementsBatch<E> {
  pub(crate) fn new() -> Self {
    Self { waiting: Arc::new(Mutex::new(None)) }
  }

  /// Joins the running exchange.
  ///
  /// Returns the consumer completing the batch when the caller must start the exchange itself.
  pub(crate) fn join(&self, consumer: BoxFutureConsumer<Vec<E>>) -> Option<BoxFutureConsumer<Vec<E>>> {
    let mut waiting = self.waiting.lock();
    match waiting.as_mut() {
      | Some(fan_out) => {
        fan_out.join(ElementsFanOut::new(consumer));
        None
      },
      | None => {
        *waiting = Some(ElementsFanOut::new(consumer));
        Some(Box::new(BatchDelivery { waiting: self.waiting.clone() }))
      },
    }
  }

  #[cfg(test)]
  pub(crate) fn joined(&self) -> bool {
    self.waiting.lock().is_some()
  }
}

struct BatchDelivery<E> {
  waiting: Waiting<E>,
}

impl<E> BatchDelivery<E> {
  fn take(&self) -> Option<ElementsFanOut<E>> {
    self.waiting.lock().take()
  }
}

impl<E: Clone + Send> FutureConsumer<Vec<E>> for BatchDelivery<E> {
  fn accept(&mut self, elements: Vec<E>) -> Result<(), MaterializeError> {
    match self.take() {
      | Some(mut fan_out) => fan_out.accept(elements),
      | None => Ok(()),
    }
  }

  fn error(&mut self, error: MaterializeError) {
    if let Some(mut fan_out) = self.take() {
      fan_out.error(error);
    }
  }
}
