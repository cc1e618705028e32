//! The caller-facing handle to a task's eventual value or failure.
//!
//! A [`ResultHandle`] and its internal producer-side counterpart, [`ResultSink`], share a single
//! write-once slot guarded by this crate's own [`Mutex`](crate::Mutex)/[`Condvar`](crate::Condvar)
//! pair — the same no-polling design the teacher crate's `ResultStorage` used, minus the
//! key-indexed map: each submission gets its own slot directly, since nothing here needs to
//! survive a client disconnect.

use std::time::{Duration, Instant};

use crate::core::deferred::{FutureLike, WaitStatus};
use crate::core::error::PoolError;
use crate::{Condvar, Mutex};
use std::sync::Arc;

/// Terminal outcome of a task, as observed through its [`ResultHandle`].
enum Outcome<T> {
    /// The task returned a value.
    Value(T),
    /// The task's body reported a failure.
    Failed(PoolError),
    /// The pool was aborted or destroyed before the task executed.
    Cancelled,
}

struct Slot<T> {
    outcome: Option<Outcome<T>>,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    condvar: Condvar,
}

/// The producer side, held by the scheduler/envelope. Write-once: the first call to
/// `complete`/`cancel` wins; subsequent calls are no-ops.
pub(crate) struct ResultSink<T> {
    shared: Arc<Shared<T>>,
}

impl<T> ResultSink<T> {
    fn write(&self, outcome: Outcome<T>) {
        let mut slot = self.shared.slot.lock();
        if slot.outcome.is_none() {
            slot.outcome = Some(outcome);
        }
        drop(slot);
        self.shared.condvar.notify_all();
    }

    /// Publish a successful return value.
    pub fn complete(&self, value: T) {
        self.write(Outcome::Value(value));
    }

    /// Publish a task failure.
    pub fn fail(&self, err: PoolError) {
        self.write(Outcome::Failed(err));
    }

    /// Publish a cancellation/broken-promise signal.
    pub fn cancel(&self) {
        self.write(Outcome::Cancelled);
    }
}

impl<T> Drop for ResultSink<T> {
    fn drop(&mut self) {
        // If the envelope is destroyed (e.g. pool abort dropped it from a queue) without the
        // sink ever being written, the caller must still observe a terminal state rather than
        // blocking forever: a dropped, never-written slot becomes "broken promise".
        let mut slot = self.shared.slot.lock();
        if slot.outcome.is_none() {
            slot.outcome = Some(Outcome::Cancelled);
            drop(slot);
            self.shared.condvar.notify_all();
        }
    }
}

/// The caller-facing handle returned from `submit`.
///
/// Exposes `get` (blocking, consuming), `wait`, `wait_for`, and `wait_until`, matching the
/// external-interface contract. A `ResultHandle` is single-reader: it is either read by the
/// caller or passed whole as a deferred argument to a downstream submission.
pub struct ResultHandle<T> {
    shared: Arc<Shared<T>>,
}

pub(crate) fn new_pair<T>() -> (ResultSink<T>, ResultHandle<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot { outcome: None }),
        condvar: Condvar::new(),
    });
    (
        ResultSink {
            shared: Arc::clone(&shared),
        },
        ResultHandle { shared },
    )
}

impl<T> ResultHandle<T> {
    /// Non-blocking readiness check.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.shared.slot.lock().outcome.is_some()
    }

    /// Block until the task has a terminal outcome.
    pub fn wait(&self) {
        let mut slot = self.shared.slot.lock();
        while slot.outcome.is_none() {
            self.shared.condvar.wait(&mut slot);
        }
    }

    /// Block up to `timeout` for a terminal outcome.
    pub fn wait_for(&self, timeout: Duration) -> WaitStatus {
        self.wait_until(Instant::now() + timeout)
    }

    /// Block until `deadline` for a terminal outcome.
    pub fn wait_until(&self, deadline: Instant) -> WaitStatus {
        let mut slot = self.shared.slot.lock();
        while slot.outcome.is_none() {
            if Instant::now() >= deadline {
                return WaitStatus::Timeout;
            }
            let result = self.shared.condvar.wait_until(&mut slot, deadline);
            if result.timed_out() && slot.outcome.is_none() {
                return WaitStatus::Timeout;
            }
        }
        WaitStatus::Ready
    }

    /// Block until the outcome is available, then consume it.
    ///
    /// Surfaces the task's own failure (if any) or a distinguishable cancellation error if the
    /// pool was aborted/destroyed before the task ran.
    pub fn get(self) -> Result<T, PoolError> {
        self.wait();
        let mut slot = self.shared.slot.lock();
        match slot.outcome.take().expect("wait() guarantees an outcome") {
            Outcome::Value(v) => Ok(v),
            Outcome::Failed(e) => Err(e),
            Outcome::Cancelled => Err(PoolError::Cancelled),
        }
    }
}

impl<T: Send + 'static> FutureLike<T> for ResultHandle<T> {
    fn poll_ready(&self) -> bool {
        self.is_ready()
    }

    fn take(self: Box<Self>) -> T {
        match (*self).get() {
            Ok(v) => v,
            Err(e) => panic!("dependency did not resolve to a value: {e}"),
        }
    }

    fn wait(&self) {
        ResultHandle::wait(self);
    }

    fn wait_for(&self, timeout: Duration) -> WaitStatus {
        ResultHandle::wait_for(self, timeout)
    }

    fn wait_until(&self, deadline: Instant) -> WaitStatus {
        ResultHandle::wait_until(self, deadline)
    }
}
