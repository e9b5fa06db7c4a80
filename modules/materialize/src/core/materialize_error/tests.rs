use alloc::string::ToString;

use super::MaterializeError;

#[test]
fn cancellation_is_detected() {
  assert!(MaterializeError::cancelled("stop").is_cancellation());
  assert!(MaterializeError::Interrupted.is_cancellation());
  assert!(!MaterializeError::failed("boom").is_cancellation());
  assert!(!MaterializeError::Deadlock.is_cancellation());
}

#[test]
fn display_includes_reason() {
  assert_eq!(MaterializeError::failed("boom").to_string(), "materialization failed: boom");
  assert_eq!(MaterializeError::callback_failed("bad").to_string(), "callback failed: bad");
}
