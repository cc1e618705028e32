//! The scheduler's type-erased unit of work.
//!
//! An envelope bundles a callable, its (possibly deferred) arguments, a result sink, and
//! optional allocator accounting into a single `Box<dyn Envelope>` the ready queue and pending
//! set can hold without knowing the callable's concrete type — the Rust equivalent of the
//! teacher's C++-style function-pointer vtable.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::core::allocator::TaskAllocator;
use crate::core::deferred::Deferred;
use crate::core::result_handle::ResultSink;
use crate::core::stop_token::StopToken;

/// Object-safe interface the scheduler drives: check readiness, then execute exactly once.
pub(crate) trait Envelope: Send {
    /// Logical AND over all arguments' readiness. Side-effect free.
    fn is_ready(&self) -> bool;

    /// Take every argument, invoke the callable, and publish the outcome to the result sink.
    /// Called at most once; the envelope is dropped immediately after.
    fn execute(self: Box<Self>, token: &StopToken);

    /// Drop the envelope without running it, publishing a cancellation signal instead.
    fn cancel(self: Box<Self>);

    /// Drop the envelope without running it because the pool is already shut down. Distinct
    /// from [`cancel`](Envelope::cancel): this is rejection at admission, not a queued task
    /// losing a race with `abort()`.
    fn reject_shutdown(self: Box<Self>);
}

fn run_capturing_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "task panicked with a non-string payload".to_string()
        }
    })
}

/// Zero-argument callable.
pub(crate) struct Call0<F, R> {
    pub callable: F,
    pub sink: ResultSink<R>,
    pub allocator: Option<Arc<dyn TaskAllocator>>,
}

impl<F, R> Envelope for Call0<F, R>
where
    F: FnOnce() -> R + Send,
    R: Send + 'static,
{
    fn is_ready(&self) -> bool {
        true
    }

    fn execute(self: Box<Self>, _token: &StopToken) {
        let Call0 { callable, sink, .. } = *self;
        match run_capturing_panic(callable) {
            Ok(value) => sink.complete(value),
            Err(msg) => sink.fail(crate::core::error::PoolError::TaskFailed(msg)),
        }
    }

    fn cancel(self: Box<Self>) {
        self.sink.cancel();
    }

    fn reject_shutdown(self: Box<Self>) {
        self.sink.fail(crate::core::error::PoolError::Shutdown);
    }
}

impl<F, R> Drop for Call0<F, R> {
    fn drop(&mut self) {
        if let Some(a) = &self.allocator {
            a.on_dealloc();
        }
    }
}

/// Zero-argument callable that receives the pool's stop token.
pub(crate) struct Call0Tok<F, R> {
    pub callable: F,
    pub sink: ResultSink<R>,
    pub allocator: Option<Arc<dyn TaskAllocator>>,
}

impl<F, R> Envelope for Call0Tok<F, R>
where
    F: FnOnce(&StopToken) -> R + Send,
    R: Send + 'static,
{
    fn is_ready(&self) -> bool {
        true
    }

    fn execute(self: Box<Self>, token: &StopToken) {
        let Call0Tok { callable, sink, .. } = *self;
        match run_capturing_panic(|| callable(token)) {
            Ok(value) => sink.complete(value),
            Err(msg) => sink.fail(crate::core::error::PoolError::TaskFailed(msg)),
        }
    }

    fn cancel(self: Box<Self>) {
        self.sink.cancel();
    }

    fn reject_shutdown(self: Box<Self>) {
        self.sink.fail(crate::core::error::PoolError::Shutdown);
    }
}

impl<F, R> Drop for Call0Tok<F, R> {
    fn drop(&mut self) {
        if let Some(a) = &self.allocator {
            a.on_dealloc();
        }
    }
}

/// Single-argument callable; the argument may be immediate or deferred.
pub(crate) struct Call1<F, A, R> {
    pub callable: Option<F>,
    pub arg: Option<Deferred<A>>,
    pub sink: ResultSink<R>,
    pub allocator: Option<Arc<dyn TaskAllocator>>,
}

impl<F, A, R> Envelope for Call1<F, A, R>
where
    F: FnOnce(A) -> R + Send,
    A: Send,
    R: Send + 'static,
{
    fn is_ready(&self) -> bool {
        self.arg.as_ref().is_some_and(Deferred::is_ready)
    }

    fn execute(self: Box<Self>, _token: &StopToken) {
        let Call1 { callable, arg, sink, .. } = *self;
        let callable = callable.expect("execute called exactly once");
        // Taking the argument must happen inside the panic boundary: a dependency that
        // resolved to a failure or cancellation panics on `take`, and that panic needs to
        // turn into this task's own `TaskFailed` instead of unwinding the worker thread.
        match run_capturing_panic(move || {
            let arg = arg.expect("execute called exactly once").take();
            callable(arg)
        }) {
            Ok(value) => sink.complete(value),
            Err(msg) => sink.fail(crate::core::error::PoolError::TaskFailed(msg)),
        }
    }

    fn cancel(self: Box<Self>) {
        self.sink.cancel();
    }

    fn reject_shutdown(self: Box<Self>) {
        self.sink.fail(crate::core::error::PoolError::Shutdown);
    }
}

impl<F, A, R> Drop for Call1<F, A, R> {
    fn drop(&mut self) {
        if let Some(a) = &self.allocator {
            a.on_dealloc();
        }
    }
}

/// Single-argument callable that also receives the pool's stop token.
pub(crate) struct Call1Tok<F, A, R> {
    pub callable: Option<F>,
    pub arg: Option<Deferred<A>>,
    pub sink: ResultSink<R>,
    pub allocator: Option<Arc<dyn TaskAllocator>>,
}

impl<F, A, R> Envelope for Call1Tok<F, A, R>
where
    F: FnOnce(A, &StopToken) -> R + Send,
    A: Send,
    R: Send + 'static,
{
    fn is_ready(&self) -> bool {
        self.arg.as_ref().is_some_and(Deferred::is_ready)
    }

    fn execute(self: Box<Self>, token: &StopToken) {
        let Call1Tok { callable, arg, sink, .. } = *self;
        let callable = callable.expect("execute called exactly once");
        match run_capturing_panic(move || {
            let arg = arg.expect("execute called exactly once").take();
            callable(arg, token)
        }) {
            Ok(value) => sink.complete(value),
            Err(msg) => sink.fail(crate::core::error::PoolError::TaskFailed(msg)),
        }
    }

    fn cancel(self: Box<Self>) {
        self.sink.cancel();
    }

    fn reject_shutdown(self: Box<Self>) {
        self.sink.fail(crate::core::error::PoolError::Shutdown);
    }
}

impl<F, A, R> Drop for Call1Tok<F, A, R> {
    fn drop(&mut self) {
        if let Some(a) = &self.allocator {
            a.on_dealloc();
        }
    }
}

/// Two-argument callable; either argument may be immediate or deferred independently.
pub(crate) struct Call2<F, A, B, R> {
    pub callable: Option<F>,
    pub arg0: Option<Deferred<A>>,
    pub arg1: Option<Deferred<B>>,
    pub sink: ResultSink<R>,
    pub allocator: Option<Arc<dyn TaskAllocator>>,
}

impl<F, A, B, R> Envelope for Call2<F, A, B, R>
where
    F: FnOnce(A, B) -> R + Send,
    A: Send,
    B: Send,
    R: Send + 'static,
{
    fn is_ready(&self) -> bool {
        self.arg0.as_ref().is_some_and(Deferred::is_ready)
            && self.arg1.as_ref().is_some_and(Deferred::is_ready)
    }

    fn execute(self: Box<Self>, _token: &StopToken) {
        let Call2 { callable, arg0, arg1, sink, .. } = *self;
        let callable = callable.expect("execute called exactly once");
        match run_capturing_panic(move || {
            let a = arg0.expect("execute called exactly once").take();
            let b = arg1.expect("execute called exactly once").take();
            callable(a, b)
        }) {
            Ok(value) => sink.complete(value),
            Err(msg) => sink.fail(crate::core::error::PoolError::TaskFailed(msg)),
        }
    }

    fn cancel(self: Box<Self>) {
        self.sink.cancel();
    }

    fn reject_shutdown(self: Box<Self>) {
        self.sink.fail(crate::core::error::PoolError::Shutdown);
    }
}

impl<F, A, B, R> Drop for Call2<F, A, B, R> {
    fn drop(&mut self) {
        if let Some(a) = &self.allocator {
            a.on_dealloc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result_handle::new_pair;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn no_token() -> StopToken {
        StopToken::new(Arc::new(crate::core::stop_token::StopFlag::new()))
    }

    #[test]
    fn call0_is_always_ready() {
        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call0 {
            callable: || 5,
            sink,
            allocator: None,
        });
        assert!(env.is_ready());
        env.execute(&no_token());
        assert_eq!(handle.get().unwrap(), 5);
    }

    #[test]
    fn call1_reflects_argument_readiness() {
        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call1 {
            callable: Some(|x: i32| x + 1),
            arg: Some(Deferred::immediate(41)),
            sink,
            allocator: None,
        });
        assert!(env.is_ready());
        env.execute(&no_token());
        assert_eq!(handle.get().unwrap(), 42);
    }

    #[test]
    fn execute_captures_panics_as_task_failure() {
        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call0 {
            callable: || -> i32 { panic!("kaboom") },
            sink,
            allocator: None,
        });
        env.execute(&no_token());
        match handle.get() {
            Err(crate::core::error::PoolError::TaskFailed(msg)) => assert_eq!(msg, "kaboom"),
            other => panic!("expected TaskFailed, got ok={}", other.is_ok()),
        }
    }

    #[test]
    fn cancel_writes_cancelled_without_running_callable() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = Arc::clone(&ran);
        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call0 {
            callable: move || {
                ran2.store(true, Ordering::SeqCst);
                1
            },
            sink,
            allocator: None,
        });
        env.cancel();
        assert!(!ran.load(Ordering::SeqCst));
        assert!(matches!(handle.get(), Err(crate::core::error::PoolError::Cancelled)));
    }

    #[test]
    fn allocator_dealloc_runs_on_drop_regardless_of_path() {
        let alloc = Arc::new(crate::core::allocator::CountingAllocator::new());
        let (sink, _handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call0 {
            callable: || 1,
            sink,
            allocator: Some(alloc.clone() as Arc<dyn TaskAllocator>),
        });
        drop(env);
        assert_eq!(alloc.deallocations(), 1);
    }

    #[test]
    fn downstream_survives_a_failed_dependency_instead_of_panicking() {
        let (upstream_sink, upstream_handle) = new_pair::<i32>();
        upstream_sink.fail(crate::core::error::PoolError::TaskFailed("upstream broke".into()));

        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call1 {
            callable: Some(|x: i32| x + 1),
            arg: Some(Deferred::from(upstream_handle)),
            sink,
            allocator: None,
        });
        // A failed dependency still reports `is_ready()` true (the slot is non-empty); the
        // scheduler executes this envelope the same as any other ready one.
        assert!(env.is_ready());
        env.execute(&no_token());
        match handle.get() {
            Err(crate::core::error::PoolError::TaskFailed(msg)) => {
                assert!(msg.contains("did not resolve"), "unexpected message: {msg}");
            }
            other => panic!("expected TaskFailed, got ok={}", other.is_ok()),
        }
    }

    #[test]
    fn call1_tok_runs_with_deferred_argument_and_receives_token() {
        let (upstream_sink, upstream_handle) = new_pair::<i32>();
        upstream_sink.complete(10);

        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call1Tok {
            callable: Some(|x: i32, token: &StopToken| if token.is_set() { -1 } else { x + 5 }),
            arg: Some(Deferred::from(upstream_handle)),
            sink,
            allocator: None,
        });
        assert!(env.is_ready());
        env.execute(&no_token());
        assert_eq!(handle.get().unwrap(), 15);
    }

    #[test]
    fn call2_requires_both_arguments_ready() {
        let (sink, handle) = new_pair::<i32>();
        let env: Box<dyn Envelope> = Box::new(Call2 {
            callable: Some(|a: i32, b: i32| a + b),
            arg0: Some(Deferred::immediate(1)),
            arg1: Some(Deferred::immediate(2)),
            sink,
            allocator: None,
        });
        assert!(env.is_ready());
        env.execute(&no_token());
        assert_eq!(handle.get().unwrap(), 3);
    }
}
