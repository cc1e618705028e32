//! Uniform wrapper turning any argument — a plain value or a future-like handle — into a
//! pair *(ready?, extract())*, so the scheduler never needs to specialize on argument types.

use std::time::{Duration, Instant};

/// Outcome of a bounded wait on a [`FutureLike`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// The value became ready before the deadline.
    Ready,
    /// The deadline elapsed before the value became ready.
    Timeout,
    /// The value depends on work that has not even started executing yet.
    Deferred,
}

/// Capability trait for anything that can be waited on and eventually yields a `T`.
///
/// Any object exposing this shape — `get`, `wait`, `wait_for(duration)`, `wait_until(instant)`
/// — is accepted as a deferred argument; everything else is wrapped as [`Deferred::Immediate`].
pub trait FutureLike<T>: Send {
    /// Non-blocking readiness check.
    fn poll_ready(&self) -> bool;

    /// Block until ready, then take the value. Scheduler code only calls this when
    /// `poll_ready()` has already returned true.
    fn take(self: Box<Self>) -> T;

    /// Block indefinitely until ready.
    fn wait(&self);

    /// Block up to `timeout`.
    fn wait_for(&self, timeout: Duration) -> WaitStatus;

    /// Block until `deadline`.
    fn wait_until(&self, deadline: Instant) -> WaitStatus;
}

/// A single task argument: either already available, or backed by a future-like handle.
pub enum Deferred<T> {
    /// The value was available at submission time.
    Immediate(T),
    /// The value depends on a not-yet-resolved handle.
    Pending(Box<dyn FutureLike<T>>),
}

impl<T> Deferred<T> {
    /// Wrap a plain, already-available value.
    pub fn immediate(value: T) -> Self {
        Self::Immediate(value)
    }

    /// Wrap a future-like handle.
    pub fn pending(handle: Box<dyn FutureLike<T>>) -> Self {
        Self::Pending(handle)
    }

    /// Logical readiness check used by `Envelope::is_ready`. Side-effect free.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        match self {
            Self::Immediate(_) => true,
            Self::Pending(h) => h.poll_ready(),
        }
    }

    /// Consume the wrapper and produce the value. Only called by the scheduler once
    /// `is_ready()` has returned true; blocks only in the `Pending` case and only because the
    /// underlying handle's own `take` contract requires it (never the case for envelopes that
    /// passed admission).
    pub fn take(self) -> T {
        match self {
            Self::Immediate(v) => v,
            Self::Pending(h) => h.take(),
        }
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Self::Immediate(value)
    }
}

impl<T: Send + 'static> From<crate::core::result_handle::ResultHandle<T>> for Deferred<T> {
    fn from(handle: crate::core::result_handle::ResultHandle<T>) -> Self {
        Self::pending(Box::new(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct TestHandle {
        ready: Arc<Mutex<bool>>,
        value: Mutex<Option<i32>>,
    }

    impl FutureLike<i32> for TestHandle {
        fn poll_ready(&self) -> bool {
            *self.ready.lock()
        }

        fn take(self: Box<Self>) -> i32 {
            self.value.lock().take().expect("value already taken")
        }

        fn wait(&self) {
            while !self.poll_ready() {
                std::thread::sleep(Duration::from_micros(100));
            }
        }

        fn wait_for(&self, timeout: Duration) -> WaitStatus {
            self.wait_until(Instant::now() + timeout)
        }

        fn wait_until(&self, deadline: Instant) -> WaitStatus {
            while !self.poll_ready() {
                if Instant::now() >= deadline {
                    return WaitStatus::Timeout;
                }
                std::thread::sleep(Duration::from_micros(100));
            }
            WaitStatus::Ready
        }
    }

    #[test]
    fn immediate_is_always_ready() {
        let d = Deferred::immediate(42);
        assert!(d.is_ready());
        assert_eq!(d.take(), 42);
    }

    #[test]
    fn pending_reports_underlying_readiness() {
        let ready = Arc::new(Mutex::new(false));
        let handle = TestHandle {
            ready: Arc::clone(&ready),
            value: Mutex::new(Some(7)),
        };
        let d = Deferred::pending(Box::new(handle));
        assert!(!d.is_ready());
        *ready.lock() = true;
        assert!(d.is_ready());
        assert_eq!(d.take(), 7);
    }

    #[test]
    fn pending_wait_for_reports_timeout_while_unready() {
        let handle = TestHandle {
            ready: Arc::new(Mutex::new(false)),
            value: Mutex::new(Some(1)),
        };
        assert_eq!(
            handle.wait_for(Duration::from_millis(5)),
            WaitStatus::Timeout
        );
    }

    #[test]
    fn plain_value_converts_to_immediate() {
        let d: Deferred<i32> = 5.into();
        assert!(d.is_ready());
        assert_eq!(d.take(), 5);
    }

    #[test]
    fn result_handle_converts_to_pending() {
        use crate::core::result_handle::new_pair;
        let (sink, handle) = new_pair::<i32>();
        let d: Deferred<i32> = handle.into();
        assert!(!d.is_ready());
        sink.complete(11);
        assert!(d.is_ready());
        assert_eq!(d.take(), 11);
    }
}
