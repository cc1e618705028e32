//! Error taxonomy for the task pool.
//!
//! Mirrors the teacher crate's `thiserror`-derived error enum: one variant per failure mode
//! named in the error-handling design, so callers can match on the specific cause instead of
//! inspecting a string.

use thiserror::Error;

/// Errors surfaced by the pool facade or by a [`ResultHandle`](crate::core::result_handle::ResultHandle).
#[derive(Debug, Error)]
pub enum PoolError {
    /// The task's body reported a failure; the payload is whatever the callable produced.
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// The envelope was dropped without executing, because the pool was aborted or destroyed.
    #[error("task was cancelled before it ran")]
    Cancelled,

    /// `submit`/`submit_with_allocator` could not obtain storage for the envelope or its
    /// result sink.
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    /// `submit` was called on a pool that has been aborted and not yet `reset`.
    #[error("pool has been shut down; call reset() before submitting again")]
    Shutdown,

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for conditions that should be unreachable in correct usage (e.g. a worker
    /// thread panicked while not executing a task).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-facing result alias for callers who want `anyhow`-flavored error handling at
/// the boundary (e.g. inside a `PoolBuilder` that also loads JSON configuration).
pub type AppResult<T> = Result<T, anyhow::Error>;
