use alloc::{sync::Arc, vec};

use super::ScheduledIteratorMaterializer;
use crate::core::{
  CancelSignal, MaterializeError,
  callback::IndexedEvent,
  context::{ExecutionContextConfig, SerialExecutionContext, TaskId},
  iterator::{
    IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer, StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe},
};

fn scheduled(
  upstream: SharedIteratorMaterializer<u32>,
  context: &SerialExecutionContext,
) -> ScheduledIteratorMaterializer<u32> {
  ScheduledIteratorMaterializer::new(upstream, context.shared(), TaskId::from("scheduled"), CancelSignal::new())
}

fn list() -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(vec![1, 2, 3]))
}

#[test]
fn operations_wait_for_the_context() {
  let context = SerialExecutionContext::new(ExecutionContextConfig::new());
  let materializer = scheduled(list(), &context);
  assert_eq!(&**materializer.task_id(), "scheduled");

  let probe = EventProbe::new();
  materializer.materialize_next(probe.consumer());
  assert!(probe.is_empty());
  assert_eq!(materializer.pending_operations(), 1);
  assert_eq!(context.pending_tasks(), 1);

  assert!(context.run_next());
  assert_eq!(probe.elements(), [1]);
  assert_eq!(materializer.pending_operations(), 0);
}

#[test]
fn operations_run_in_submission_order() {
  let context = SerialExecutionContext::new(ExecutionContextConfig::new());
  let materializer = scheduled(list(), &context);
  let first = EventProbe::new();
  let second = EventProbe::new();
  let rest = ResultProbe::new();
  materializer.materialize_next(first.consumer());
  materializer.materialize_next(second.consumer());
  materializer.materialize_elements(rest.consumer());
  assert_eq!(context.run_until_idle(), 3);

  assert_eq!(first.elements(), [1]);
  assert_eq!(second.elements(), [2]);
  assert_eq!(rest.take(), Some(Ok(vec![3])));
}

#[test]
fn cancel_fails_operations_that_have_not_run() {
  let context = SerialExecutionContext::new(ExecutionContextConfig::new());
  let materializer = scheduled(list(), &context);
  let next = EventProbe::new();
  let has_next = ResultProbe::new();
  materializer.materialize_next(next.consumer());
  materializer.materialize_has_next(has_next.consumer());

  materializer.materialize_cancel(MaterializeError::cancelled("stop"));
  assert_eq!(next.events(), [IndexedEvent::Error(MaterializeError::cancelled("stop"))]);
  assert_eq!(has_next.take(), Some(Err(MaterializeError::cancelled("stop"))));
  assert_eq!(context.pending_tasks(), 0);
  assert!(materializer.is_cancelled());
}

#[test]
fn requests_after_cancel_fail_immediately() {
  let context = SerialExecutionContext::new(ExecutionContextConfig::new());
  let materializer = scheduled(list(), &context);
  materializer.materialize_cancel(MaterializeError::cancelled("stop"));

  let skipped = ResultProbe::new();
  materializer.materialize_skip(1, skipped.consumer());
  assert_eq!(skipped.take(), Some(Err(MaterializeError::cancelled("stop"))));
  assert_eq!(context.pending_tasks(), 0);
}

#[test]
fn cancel_reaches_callbacks_already_held_upstream() {
  let context = SerialExecutionContext::new(ExecutionContextConfig::new());
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::new(CancelSignal::new(), parked.clone()).shared();
  let materializer = scheduled(upstream, &context);
  let probe = EventProbe::new();
  materializer.materialize_next(probe.consumer());
  assert!(context.run_next());
  assert_eq!(parked.pending(), 1);

  materializer.materialize_cancel(MaterializeError::cancelled("stop"));
  assert_eq!(parked.cancellations(), [MaterializeError::cancelled("stop")]);
  assert_eq!(probe.events(), [IndexedEvent::Error(MaterializeError::cancelled("stop"))]);
}
