//! The public task pool facade: construction, submission, lifecycle control.

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::PoolConfig;
use crate::core::allocator::TaskAllocator;
use crate::core::deferred::Deferred;
use crate::core::envelope::{Call0, Call0Tok, Call1, Call1Tok, Call2};
use crate::core::result_handle::{new_pair, ResultHandle};
use crate::core::scheduler::Scheduler;
use crate::core::stop_token::{StopFlag, StopToken};
use crate::Mutex;

struct Lifecycle {
    thread_count: u32,
    workers: Vec<JoinHandle<()>>,
}

/// A fixed-size worker fleet that runs submitted callables concurrently.
///
/// `Pool` is the product: construct one with [`Pool::new`] or a
/// [`PoolBuilder`](crate::builders::PoolBuilder), submit work, and read results back through the
/// returned [`ResultHandle`].
pub struct Pool {
    scheduler: Arc<Scheduler>,
    stop_flag: Arc<StopFlag>,
    lifecycle: Mutex<Lifecycle>,
    stack_size: Option<usize>,
    name_prefix: String,
}

fn resolve_thread_count(requested: u32) -> u32 {
    if requested == 0 {
        u32::try_from(num_cpus::get()).unwrap_or(1).max(1)
    } else {
        requested
    }
}

fn spawn_workers(
    scheduler: &Arc<Scheduler>,
    stop_flag: &Arc<StopFlag>,
    name_prefix: &str,
    stack_size: Option<usize>,
    count: u32,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|index| {
            let scheduler = Arc::clone(scheduler);
            let token = StopToken::new(Arc::clone(stop_flag));
            let mut builder = std::thread::Builder::new().name(format!("{name_prefix}-{index}"));
            if let Some(size) = stack_size {
                builder = builder.stack_size(size);
            }
            builder
                .spawn(move || {
                    tracing::info!(worker = index, "worker started");
                    scheduler.run_worker(&token);
                    tracing::info!(worker = index, "worker stopped");
                })
                .expect("failed to spawn worker thread")
        })
        .collect()
}

impl Pool {
    /// Construct a pool with `thread_count` workers. `0` auto-detects hardware concurrency,
    /// falling back to 1 on a system that can't report it.
    #[must_use]
    pub fn new(thread_count: u32) -> Self {
        Self::from_parts(thread_count, None, "taskpool-worker".to_string())
    }

    pub(crate) fn from_config(config: &PoolConfig) -> Self {
        Self::from_parts(
            config.thread_count,
            config.thread_stack_size,
            config.thread_name_prefix.clone(),
        )
    }

    fn from_parts(thread_count: u32, stack_size: Option<usize>, name_prefix: String) -> Self {
        let resolved = resolve_thread_count(thread_count);
        let stop_flag = Arc::new(StopFlag::new());
        let scheduler = Arc::new(Scheduler::new(Arc::clone(&stop_flag)));
        let workers = spawn_workers(&scheduler, &stop_flag, &name_prefix, stack_size, resolved);
        tracing::info!(thread_count = resolved, "pool started");
        Self {
            scheduler,
            stop_flag,
            lifecycle: Mutex::new(Lifecycle {
                thread_count: resolved,
                workers,
            }),
            stack_size,
            name_prefix,
        }
    }

    /// Submit a zero-argument callable.
    pub fn submit<F, R>(&self, callable: F) -> ResultHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (sink, handle) = new_pair();
        tracing::debug!(tasks_queued = self.scheduler.tasks_queued(), "task submitted");
        self.scheduler.admit(Box::new(Call0 {
            callable,
            sink,
            allocator: None,
        }));
        handle
    }

    /// Submit a zero-argument callable that receives the pool's stop token.
    pub fn submit_with_token<F, R>(&self, callable: F) -> ResultHandle<R>
    where
        F: FnOnce(&StopToken) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (sink, handle) = new_pair();
        tracing::debug!(tasks_queued = self.scheduler.tasks_queued(), "task submitted");
        self.scheduler.admit(Box::new(Call0Tok {
            callable,
            sink,
            allocator: None,
        }));
        handle
    }

    /// Submit a single-argument callable. `arg` may be a plain value or a [`ResultHandle`] from
    /// a prior submission — either converts into a [`Deferred`] automatically.
    pub fn submit_with_arg<F, A, R>(&self, callable: F, arg: impl Into<Deferred<A>>) -> ResultHandle<R>
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
        R: Send + 'static,
    {
        let (sink, handle) = new_pair();
        tracing::debug!(tasks_queued = self.scheduler.tasks_queued(), "task submitted");
        self.scheduler.admit(Box::new(Call1 {
            callable: Some(callable),
            arg: Some(arg.into()),
            sink,
            allocator: None,
        }));
        handle
    }

    /// Submit a single-argument callable that also receives the pool's stop token.
    pub fn submit_with_arg_and_token<F, A, R>(
        &self,
        callable: F,
        arg: impl Into<Deferred<A>>,
    ) -> ResultHandle<R>
    where
        F: FnOnce(A, &StopToken) -> R + Send + 'static,
        A: Send + 'static,
        R: Send + 'static,
    {
        let (sink, handle) = new_pair();
        tracing::debug!(tasks_queued = self.scheduler.tasks_queued(), "task submitted");
        self.scheduler.admit(Box::new(Call1Tok {
            callable: Some(callable),
            arg: Some(arg.into()),
            sink,
            allocator: None,
        }));
        handle
    }

    /// Submit a two-argument callable; either argument may independently be plain or deferred.
    pub fn submit_with_args2<F, A, B, R>(
        &self,
        callable: F,
        arg0: impl Into<Deferred<A>>,
        arg1: impl Into<Deferred<B>>,
    ) -> ResultHandle<R>
    where
        F: FnOnce(A, B) -> R + Send + 'static,
        A: Send + 'static,
        B: Send + 'static,
        R: Send + 'static,
    {
        let (sink, handle) = new_pair();
        tracing::debug!(tasks_queued = self.scheduler.tasks_queued(), "task submitted");
        self.scheduler.admit(Box::new(Call2 {
            callable: Some(callable),
            arg0: Some(arg0.into()),
            arg1: Some(arg1.into()),
            sink,
            allocator: None,
        }));
        handle
    }

    /// Submit a zero-argument callable whose envelope/result-sink allocation is accounted for
    /// through `allocator`.
    pub fn submit_with_allocator<F, R>(
        &self,
        allocator: Arc<dyn TaskAllocator>,
        callable: F,
    ) -> ResultHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        allocator.on_alloc();
        let (sink, handle) = new_pair();
        tracing::debug!(tasks_queued = self.scheduler.tasks_queued(), "task submitted");
        self.scheduler.admit(Box::new(Call0 {
            callable,
            sink,
            allocator: Some(allocator),
        }));
        handle
    }

    /// Stop dispatching ready envelopes to workers. Submission and pending→ready promotion
    /// continue.
    pub fn pause(&self) {
        self.scheduler.pause();
    }

    /// Resume dispatching ready envelopes.
    pub fn unpause(&self) {
        self.scheduler.unpause();
    }

    /// Whether the pool is currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// A cheap, cloneable observer of this pool's cancellation flag.
    #[must_use]
    pub fn get_stop_token(&self) -> StopToken {
        StopToken::new(Arc::clone(&self.stop_flag))
    }

    /// Envelopes admitted but not yet completed: `|ready| + |pending| + running`.
    #[must_use]
    pub fn get_tasks_queued(&self) -> usize {
        self.scheduler.tasks_queued()
    }

    /// Envelopes currently executing on a worker.
    #[must_use]
    pub fn get_tasks_running(&self) -> usize {
        self.scheduler.tasks_running()
    }

    /// Synonymous with [`Pool::get_tasks_queued`] at the public surface.
    #[must_use]
    pub fn get_tasks_total(&self) -> usize {
        self.get_tasks_queued()
    }

    /// Current worker thread count.
    #[must_use]
    pub fn get_thread_count(&self) -> u32 {
        self.lifecycle.lock().thread_count
    }

    /// Block until the ready queue and running set are empty (or, if paused, until nothing is
    /// running). Never raises the stop flag.
    pub fn wait_for_tasks(&self) {
        self.scheduler.wait_for_tasks();
    }

    /// Raise the stop flag, wake every worker, and cancel every envelope still queued. Running
    /// envelopes finish on their own; workers exit once they notice the flag.
    pub fn abort(&self) {
        tracing::warn!("pool aborted");
        self.scheduler.abort();
    }

    /// Drain, stop and join the current workers, clear the stop flag, then spawn `thread_count`
    /// fresh workers. The pool's paused/unpaused state is preserved across the reset.
    pub fn reset(&self, thread_count: u32) {
        let was_paused = self.scheduler.is_paused();
        tracing::info!(new_thread_count = thread_count, "pool reset requested");

        self.scheduler.pause();
        self.scheduler.wait_for_tasks();
        self.scheduler.abort();

        let mut lifecycle = self.lifecycle.lock();
        for worker in lifecycle.workers.drain(..) {
            let _ = worker.join();
        }
        self.scheduler.clear_abort();

        let resolved = resolve_thread_count(thread_count);
        lifecycle.workers = spawn_workers(
            &self.scheduler,
            &self.stop_flag,
            &self.name_prefix,
            self.stack_size,
            resolved,
        );
        lifecycle.thread_count = resolved;
        drop(lifecycle);

        if !was_paused {
            self.scheduler.unpause();
        }
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.scheduler.abort();
        let mut lifecycle = self.lifecycle.lock();
        for worker in lifecycle.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
