extern crate std;

use std::{sync::mpsc, time::Duration};

use tokio::runtime::{Builder, Runtime};

use super::TokioExecutionContext;
use crate::core::context::{ContextTask, ExecutionContext, ExecutionContextConfig, TaskId};

const WAIT: Duration = Duration::from_secs(2);

fn runtime() -> Runtime {
  Builder::new_multi_thread().worker_threads(2).enable_all().build().expect("runtime")
}

#[test]
fn runs_tasks_on_worker_and_reports_current() {
  let runtime = runtime();
  let context = TokioExecutionContext::new(runtime.handle(), ExecutionContextConfig::new().with_name("tokio-test"));
  let (sender, receiver) = mpsc::channel();
  let probe = context.clone();
  context.schedule_after(ContextTask::boxed(TaskId::from("lookup"), 1, move || {
    sender.send((probe.is_current(), probe.current_task_id())).expect("send");
  }));
  let (current, task_id) = receiver.recv_timeout(WAIT).expect("task ran");
  assert!(current);
  assert_eq!(task_id.as_deref(), Some("lookup"));
  assert!(!context.is_current());
  assert_eq!(context.current_task_id(), None);
}

#[test]
fn runs_tasks_in_schedule_order() {
  let runtime = runtime();
  let context = TokioExecutionContext::new(runtime.handle(), ExecutionContextConfig::new());
  let (sender, receiver) = mpsc::channel();
  for label in 0..10 {
    let sender = sender.clone();
    context.schedule_after(ContextTask::boxed(TaskId::from("order"), 1, move || {
      sender.send(label).expect("send");
    }));
  }
  let observed: std::vec::Vec<i32> = (0..10).map(|_| receiver.recv_timeout(WAIT).expect("task ran")).collect();
  assert_eq!(observed, (0..10).collect::<std::vec::Vec<_>>());
}

#[test]
fn another_context_is_not_current() {
  let runtime = runtime();
  let first = TokioExecutionContext::new(runtime.handle(), ExecutionContextConfig::new());
  let second = TokioExecutionContext::new(runtime.handle(), ExecutionContextConfig::new());
  let (sender, receiver) = mpsc::channel();
  let other = second.clone();
  first.schedule_after(ContextTask::boxed(TaskId::from("cross"), 1, move || {
    sender.send(other.is_current()).expect("send");
  }));
  assert!(!receiver.recv_timeout(WAIT).expect("task ran"));
}
