//! Cooperative cancellation flag and its read-only observer.
//!
//! A [`StopFlag`] is owned by a [`Pool`](crate::core::pool::Pool); a [`StopToken`] is a cheap,
//! copyable handle over it that long-running task bodies can poll to cooperate with
//! `abort()`/destruction. The pool never interrupts executing code — tasks must check the
//! token themselves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag owned by a pool.
#[derive(Debug, Default)]
pub struct StopFlag {
    flag: AtomicBool,
}

impl StopFlag {
    /// Create a new, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Raise the flag. Idempotent.
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Clear the flag. Only called by `reset()`, never by `abort()`.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Current state of the flag.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// A read-only observer of a pool's cancellation flag.
///
/// Tokens are cheap to copy and safe to hold past the pool's lifetime only if the caller
/// guarantees no dereference after drop; the recommended contract is *token ≤ pool*.
#[derive(Debug, Clone)]
pub struct StopToken {
    flag: Arc<StopFlag>,
}

impl StopToken {
    pub(crate) fn new(flag: Arc<StopFlag>) -> Self {
        Self { flag }
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.is_set()
    }

    /// Busy-poll helper for tests: block up to `timeout`, returning true if the flag became
    /// set within that window. Not used by the scheduler itself — tasks decide their own
    /// polling cadence.
    #[must_use]
    pub fn wait_while_unset(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.flag.is_set() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_micros(200));
        }
    }
}
