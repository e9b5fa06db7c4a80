use alloc::{sync::Arc, vec::Vec};

use portable_atomic::AtomicU8;
use spin::Mutex;

use super::{
  CancelledIteratorMaterializer, FailedIteratorMaterializer, ImmaterialState, IteratorMaterializer,
  SharedIteratorMaterializer,
};
use crate::core::{
  CancelSignal, LOG_TARGET, MaterializeError, MaterializerStatus,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate},
};

#[cfg(test)]
mod tests;

enum CurrentState<E> {
  Immaterial(Arc<dyn ImmaterialState<E>>),
  Frozen(SharedIteratorMaterializer<E>),
}

impl<E> Clone for CurrentState<E> {
  fn clone(&self) -> Self {
    match self {
      | Self::Immaterial(state) => Self::Immaterial(state.clone()),
      | Self::Frozen(state) => Self::Frozen(state.clone()),
    }
  }
}

struct StatefulInner<E> {
  status: AtomicU8,
  cancel: CancelSignal,
  state:  Mutex<CurrentState<E>>,
}

/// State machine base shared by every combinator.
///
/// Holds an atomic status and the current state. While running, every operation is delegated to
/// the installed [`ImmaterialState`]; the first successful transition freezes the machine into a
/// terminal materializer to which every later operation is delegated. The lock guarding the
/// current state is never held while a state or callback runs.
pub struct StatefulIteratorMaterializer<E> {
  inner: Arc<StatefulInner<E>>,
}

impl<E> Clone for StatefulIteratorMaterializer<E> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<E: Send + 'static> StatefulIteratorMaterializer<E> {
  /// Creates a running machine delegating to `state`.
  #[must_use]
  pub fn new<S>(cancel: CancelSignal, state: S) -> Self
  where
    S: ImmaterialState<E> + 'static, {
    Self {
      inner: Arc::new(StatefulInner {
        status: AtomicU8::new(MaterializerStatus::Running.as_u8()),
        cancel,
        state: Mutex::new(CurrentState::Immaterial(Arc::new(state))),
      }),
    }
  }

  /// Returns the cancellation signal consulted on error paths.
  #[must_use]
  pub fn cancel_signal(&self) -> &CancelSignal {
    &self.inner.cancel
  }

  /// Returns a shared handle to this machine.
  #[must_use]
  pub fn shared(&self) -> SharedIteratorMaterializer<E> {
    Arc::new(self.clone())
  }

  /// Returns the terminal state once the machine has transitioned.
  #[must_use]
  pub fn frozen_state(&self) -> Option<SharedIteratorMaterializer<E>> {
    match &*self.inner.state.lock() {
      | CurrentState::Frozen(state) => Some(state.clone()),
      | CurrentState::Immaterial(_) => None,
    }
  }

  /// Returns `true` once a transition has happened.
  pub(crate) fn is_frozen(&self) -> bool {
    MaterializerStatus::load(&self.inner.status).is_terminal()
  }

  /// Freezes the machine into `state`.
  ///
  /// # Errors
  ///
  /// Returns the already frozen state when another transition won.
  pub fn set_done(
    &self,
    state: SharedIteratorMaterializer<E>,
  ) -> Result<SharedIteratorMaterializer<E>, SharedIteratorMaterializer<E>> {
    self.transition(MaterializerStatus::Done, state)
  }

  /// Freezes the machine into `state`, or returns the state an earlier transition froze it into.
  pub fn freeze(&self, state: SharedIteratorMaterializer<E>) -> SharedIteratorMaterializer<E> {
    match self.set_done(state) {
      | Ok(state) | Err(state) => state,
    }
  }

  /// Fails the machine and returns the error a pending callback should observe.
  pub(crate) fn fail_with(&self, error: MaterializeError) -> MaterializeError {
    let error = self.inner.cancel.resolve(error);
    self.set_failed(error.clone());
    error
  }

  /// Fails the machine, returning the resulting terminal state.
  ///
  /// A cancellation observed on the signal takes precedence over `error`.
  pub fn set_failed(&self, error: MaterializeError) -> SharedIteratorMaterializer<E> {
    let error = self.inner.cancel.resolve(error);
    let next: SharedIteratorMaterializer<E> = if error.is_cancellation() {
      Arc::new(CancelledIteratorMaterializer::new(error))
    } else {
      Arc::new(FailedIteratorMaterializer::new(error))
    };
    let status = if next.is_cancelled() { MaterializerStatus::Cancelled } else { MaterializerStatus::Failed };
    match self.transition(status, next) {
      | Ok(state) | Err(state) => state,
    }
  }

  /// Cancels the machine, returning the resulting terminal state.
  pub fn set_cancelled(&self, error: MaterializeError) -> SharedIteratorMaterializer<E> {
    self.inner.cancel.cancel(error.clone());
    let error = self.inner.cancel.resolve(error);
    match self.transition(MaterializerStatus::Cancelled, Arc::new(CancelledIteratorMaterializer::new(error))) {
      | Ok(state) | Err(state) => state,
    }
  }

  fn transition(
    &self,
    desired: MaterializerStatus,
    next: SharedIteratorMaterializer<E>,
  ) -> Result<SharedIteratorMaterializer<E>, SharedIteratorMaterializer<E>> {
    let mut guard = self.inner.state.lock();
    match MaterializerStatus::compare_exchange(MaterializerStatus::Running, desired, &self.inner.status) {
      | Ok(_) => {
        // 旧状態の破棄はロック解放後に行う
        let previous = core::mem::replace(&mut *guard, CurrentState::Frozen(next.clone()));
        drop(guard);
        drop(previous);
        tracing::trace!(target: LOG_TARGET, status = ?desired, "materializer transitioned");
        Ok(next)
      },
      | Err(_) => match &*guard {
        | CurrentState::Frozen(current) => Err(current.clone()),
        // status and state are only changed together under this lock
        | CurrentState::Immaterial(_) => Err(next),
      },
    }
  }

  fn current(&self) -> CurrentState<E> {
    self.inner.state.lock().clone()
  }
}

impl<E: Send + 'static> IteratorMaterializer<E> for StatefulIteratorMaterializer<E> {
  fn known_size(&self) -> Option<usize> {
    match self.current() {
      | CurrentState::Immaterial(state) => state.known_size(),
      | CurrentState::Frozen(state) => state.known_size(),
    }
  }

  fn status(&self) -> MaterializerStatus {
    match MaterializerStatus::load(&self.inner.status) {
      | MaterializerStatus::Done => match self.current() {
        | CurrentState::Frozen(state) => state.status(),
        | CurrentState::Immaterial(_) => MaterializerStatus::Done,
      },
      | status => status,
    }
  }

  fn is_materialized_at_once(&self) -> bool {
    match self.current() {
      | CurrentState::Immaterial(state) => state.is_materialized_at_once(),
      | CurrentState::Frozen(state) => state.is_materialized_at_once(),
    }
  }

  fn materialize_cancel(&self, error: MaterializeError) {
    self.inner.cancel.cancel(error.clone());
    let error = self.inner.cancel.resolve(error);
    tracing::debug!(target: LOG_TARGET, %error, "cancelling materializer");
    match self.current() {
      | CurrentState::Immaterial(state) => state.materialize_cancel(self, error),
      | CurrentState::Frozen(state) => state.materialize_cancel(error),
    }
  }

  fn materialize_elements(&self, consumer: BoxFutureConsumer<Vec<E>>) {
    match self.current() {
      | CurrentState::Immaterial(state) => state.materialize_elements(self, consumer),
      | CurrentState::Frozen(state) => state.materialize_elements(consumer),
    }
  }

  fn materialize_has_next(&self, consumer: BoxFutureConsumer<bool>) {
    match self.current() {
      | CurrentState::Immaterial(state) => state.materialize_has_next(self, consumer),
      | CurrentState::Frozen(state) => state.materialize_has_next(consumer),
    }
  }

  fn materialize_next(&self, consumer: BoxIndexedFutureConsumer<E>) {
    match self.current() {
      | CurrentState::Immaterial(state) => state.materialize_next(self, consumer),
      | CurrentState::Frozen(state) => state.materialize_next(consumer),
    }
  }

  fn materialize_next_while(&self, predicate: BoxIndexedFuturePredicate<E>) {
    match self.current() {
      | CurrentState::Immaterial(state) => state.materialize_next_while(self, predicate),
      | CurrentState::Frozen(state) => state.materialize_next_while(predicate),
    }
  }

  fn materialize_skip(&self, count: usize, consumer: BoxFutureConsumer<usize>) {
    match self.current() {
      | CurrentState::Immaterial(state) => state.materialize_skip(self, count, consumer),
      | CurrentState::Frozen(state) => state.materialize_skip(count, consumer),
    }
  }

  fn weight_cancel(&self) -> usize {
    match self.current() {
      | CurrentState::Immaterial(state) => state.weight_cancel(),
      | CurrentState::Frozen(state) => state.weight_cancel(),
    }
  }

  fn weight_elements(&self) -> usize {
    match self.current() {
      | CurrentState::Immaterial(state) => state.weight_elements(),
      | CurrentState::Frozen(state) => state.weight_elements(),
    }
  }

  fn weight_has_next(&self) -> usize {
    match self.current() {
      | CurrentState::Immaterial(state) => state.weight_has_next(),
      | CurrentState::Frozen(state) => state.weight_has_next(),
    }
  }

  fn weight_next(&self) -> usize {
    match self.current() {
      | CurrentState::Immaterial(state) => state.weight_next(),
      | CurrentState::Frozen(state) => state.weight_next(),
    }
  }

  fn weight_next_while(&self) -> usize {
    match self.current() {
      | CurrentState::Immaterial(state) => state.weight_next_while(),
      | CurrentState::Frozen(state) => state.weight_next_while(),
    }
  }

  fn weight_skip(&self) -> usize {
    match self.current() {
      | CurrentState::Immaterial(state) => state.weight_skip(),
      | CurrentState::Frozen(state) => state.weight_skip(),
    }
  }
}
