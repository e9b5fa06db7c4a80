use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use super::FnFutureConsumer;
use crate::core::{MaterializeError, callback::FutureConsumer};

#[test]
fn forwards_value_and_error_to_closure() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  let mut consumer = FnFutureConsumer::new(move |result: Result<&'static str, MaterializeError>| {
    sink.lock().push(result);
    Ok(())
  });
  assert_eq!(consumer.accept("value"), Ok(()));
  consumer.error(MaterializeError::NoSuchElement);
  assert_eq!(*seen.lock(), [Ok("value"), Err(MaterializeError::NoSuchElement)]);
}
