extern crate std;

use alloc::{sync::Arc, vec, vec::Vec};
use std::sync::mpsc;

use tokio::runtime::Builder;

use super::BlockingIteratorMaterializer;
use crate::{
  core::{
    IteratorPipeline, MaterializeError,
    context::{ContextTask, ExecutionContext, ExecutionContextConfig, SerialExecutionContext, TaskId},
    iterator::{FailedIteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer},
  },
  std::TokioExecutionContext,
};

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

#[test]
fn answers_each_operation_synchronously() {
  let blocking = BlockingIteratorMaterializer::new(list(vec![1, 2, 3, 4, 5]));
  assert_eq!(blocking.has_next(), Ok(true));
  assert_eq!(blocking.next_element(), Ok(Some(1)));
  assert_eq!(blocking.skip_elements(2), Ok(2));
  assert_eq!(blocking.elements(), Ok(vec![4, 5]));
  assert_eq!(blocking.has_next(), Ok(false));
  assert_eq!(blocking.next_element(), Ok(None));
}

#[test]
fn iterator_stops_after_first_error() {
  let failed: SharedIteratorMaterializer<u32> =
    Arc::new(FailedIteratorMaterializer::new(MaterializeError::failed("io")));
  let mut blocking = BlockingIteratorMaterializer::new(failed);
  assert_eq!(blocking.next(), Some(Err(MaterializeError::failed("io"))));
  assert_eq!(blocking.next(), None);
}

#[test]
fn iterator_yields_every_element() {
  let blocking = BlockingIteratorMaterializer::new(list(vec![7, 8, 9]));
  let collected: Result<Vec<_>, _> = blocking.collect();
  assert_eq!(collected, Ok(vec![7, 8, 9]));
}

#[test]
fn refuses_to_block_inside_the_driving_context() {
  let context = SerialExecutionContext::new(ExecutionContextConfig::new());
  let blocking = BlockingIteratorMaterializer::with_context(list(vec![1]), context.shared());
  let (sender, receiver) = mpsc::channel();
  context.schedule_after(ContextTask::boxed(TaskId::from("inside"), 1, move || {
    sender.send(blocking.next_element()).expect("send");
  }));
  assert!(context.run_next());
  assert_eq!(receiver.recv().expect("task ran"), Err(MaterializeError::Deadlock));
}

#[test]
fn waits_for_a_scheduled_pipeline_driven_by_tokio() {
  let runtime = Builder::new_multi_thread().worker_threads(2).enable_all().build().expect("runtime");
  let context = TokioExecutionContext::new(runtime.handle(), ExecutionContextConfig::new());
  let pipeline = IteratorPipeline::from_vec((1..=100).collect::<Vec<u32>>())
    .filter(|_, element| element % 2 == 0)
    .scheduled(context.shared(), "blocking-test");
  let blocking = BlockingIteratorMaterializer::with_context(pipeline.materializer(), context.shared());
  assert_eq!(blocking.next_element(), Ok(Some(2)));
  let rest: Result<Vec<_>, _> = blocking.collect();
  assert_eq!(rest, Ok((4..=100).step_by(2).collect::<Vec<u32>>()));
}
