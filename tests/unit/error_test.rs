//! Tests for error types

use taskpool::core::PoolError;

#[test]
fn test_task_failed_error() {
    let err = PoolError::TaskFailed("divide by zero".to_string());
    assert_eq!(format!("{err}"), "task failed: divide by zero");
}

#[test]
fn test_cancelled_error() {
    let err = PoolError::Cancelled;
    assert_eq!(format!("{err}"), "task was cancelled before it ran");
}

#[test]
fn test_allocation_failed_error() {
    let err = PoolError::AllocationFailed("arena exhausted".to_string());
    assert_eq!(format!("{err}"), "allocation failed: arena exhausted");
}

#[test]
fn test_shutdown_error() {
    let err = PoolError::Shutdown;
    assert_eq!(
        format!("{err}"),
        "pool has been shut down; call reset() before submitting again"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = PoolError::InvalidConfig("thread_count must be >= 0".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: thread_count must be >= 0"
    );
}

#[test]
fn test_internal_error() {
    let err = PoolError::Internal("worker thread panicked while idle".to_string());
    assert_eq!(
        format!("{err}"),
        "internal error: worker thread panicked while idle"
    );
}
