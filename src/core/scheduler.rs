//! The dual-queue scheduling core: a FIFO ready queue plus an unordered pending set, with
//! workers rotating through a transient "checker" role that promotes newly-ready envelopes.
//!
//! This is the centrepiece the rest of the crate is built around. `M_R`/`C_added` guard the
//! ready queue; `M_P` guards the pending set; `C_done` wakes callers blocked in
//! `wait_for_tasks`. Lock ordering is fixed: a worker may hold `M_P` (try-locked), release it,
//! and only then acquire `M_R` — never the reverse.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::envelope::Envelope;
use crate::core::stop_token::{StopFlag, StopToken};
use crate::{Condvar, Mutex};

const DONE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Owns the ready queue, the pending set, and the counters/flags that coordinate them.
///
/// A `Scheduler` does not own worker threads; [`crate::core::pool::Pool`] spawns threads that
/// each call [`Scheduler::run_worker`] in a loop. The abort flag it polls is the same
/// [`StopFlag`] exposed to callers as a [`StopToken`], so `abort()` and cooperative cancellation
/// are two views of one piece of state.
pub(crate) struct Scheduler {
    ready: Mutex<VecDeque<Box<dyn Envelope>>>,
    c_added: Condvar,
    pending: Mutex<Vec<Box<dyn Envelope>>>,
    done_gate: Mutex<()>,
    c_done: Condvar,
    tasks_queued: AtomicUsize,
    paused: AtomicBool,
    stop_flag: Arc<StopFlag>,
    waiting: AtomicBool,
}

impl Scheduler {
    pub(crate) fn new(stop_flag: Arc<StopFlag>) -> Self {
        Self {
            ready: Mutex::new(VecDeque::new()),
            c_added: Condvar::new(),
            pending: Mutex::new(Vec::new()),
            done_gate: Mutex::new(()),
            c_done: Condvar::new(),
            tasks_queued: AtomicUsize::new(0),
            paused: AtomicBool::new(false),
            stop_flag,
            waiting: AtomicBool::new(false),
        }
    }

    /// Admission protocol for a freshly submitted envelope: counts it into `tasks_queued`
    /// exactly once, then routes it to the ready queue or the pending set depending on
    /// `is_ready()`.
    ///
    /// Once the stop flag is set, every worker has already returned from `run_worker` and
    /// nothing will ever pop this envelope back out — so admission past that point rejects the
    /// envelope with `Shutdown` instead of routing it into a queue that will never drain.
    pub(crate) fn admit(&self, env: Box<dyn Envelope>) {
        if self.stop_flag.is_set() {
            env.reject_shutdown();
            return;
        }
        self.tasks_queued.fetch_add(1, Ordering::Relaxed);
        self.route(env);
    }

    fn route(&self, env: Box<dyn Envelope>) {
        if env.is_ready() {
            self.ready.lock().push_back(env);
        } else {
            self.pending.lock().push(env);
        }
        self.c_added.notify_one();
    }

    /// Promote an envelope already confirmed ready by the checker. Unlike `admit`, this does
    /// not touch `tasks_queued` — the envelope was already counted when it was first admitted.
    fn promote(&self, env: Box<dyn Envelope>) {
        self.ready.lock().push_back(env);
        self.c_added.notify_one();
    }

    /// One worker's main loop body. Runs until `abort()` is observed.
    pub(crate) fn run_worker(&self, token: &StopToken) {
        loop {
            self.try_act_as_checker();

            let mut ready = self.ready.lock();
            if self.stop_flag.is_set() {
                return;
            }
            while ready.is_empty() && !self.stop_flag.is_set() {
                self.c_added.wait(&mut ready);
            }
            if self.stop_flag.is_set() {
                return;
            }
            if self.paused.load(Ordering::Acquire) || ready.is_empty() {
                drop(ready);
                std::thread::yield_now();
                continue;
            }
            let env = ready.pop_front().expect("checked non-empty above");
            drop(ready);

            env.execute(token);
            self.tasks_queued.fetch_sub(1, Ordering::Relaxed);
            if self.waiting.load(Ordering::Acquire) {
                self.c_done.notify_one();
            }
        }
    }

    /// Step 1 of the worker loop: try (non-blocking) to take the checker role, partition the
    /// pending set into ready-now / still-pending, and promote the ready ones.
    fn try_act_as_checker(&self) {
        let Some(mut pending) = self.pending.try_lock() else {
            return;
        };
        if pending.is_empty() {
            return;
        }
        let drained: Vec<_> = pending.drain(..).collect();
        drop(pending);

        let mut ready_now = Vec::new();
        let mut still_pending = Vec::new();
        for env in drained {
            if env.is_ready() {
                ready_now.push(env);
            } else {
                still_pending.push(env);
            }
        }
        if !still_pending.is_empty() {
            self.pending.lock().extend(still_pending);
        }
        if !ready_now.is_empty() {
            // Wake a second worker so the checker role keeps rotating instead of one worker
            // monopolising it.
            self.c_added.notify_one();
            for env in ready_now {
                self.promote(env);
            }
        }
    }

    pub(crate) fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub(crate) fn unpause(&self) {
        self.paused.store(false, Ordering::Release);
        self.c_added.notify_all();
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.stop_flag.is_set()
    }

    pub(crate) fn clear_abort(&self) {
        self.stop_flag.clear();
    }

    /// Raise the abort flag, wake every worker, and cancel every envelope still sitting in
    /// either queue. Running envelopes are left to finish on their own.
    pub(crate) fn abort(&self) {
        self.stop_flag.set();
        self.c_added.notify_all();
        self.c_done.notify_all();

        let drained_ready: Vec<_> = self.ready.lock().drain(..).collect();
        let drained_pending: Vec<_> = self.pending.lock().drain(..).collect();
        let cancelled = drained_ready.len() + drained_pending.len();
        for env in drained_ready.into_iter().chain(drained_pending) {
            env.cancel();
        }
        self.tasks_queued.fetch_sub(cancelled, Ordering::Relaxed);
    }

    pub(crate) fn tasks_queued(&self) -> usize {
        self.tasks_queued.load(Ordering::Relaxed)
    }

    pub(crate) fn tasks_running(&self) -> usize {
        let queued = self.tasks_queued();
        let ready_len = self.ready.lock().len();
        let pending_len = self.pending.lock().len();
        queued.saturating_sub(ready_len + pending_len)
    }

    fn drained(&self) -> bool {
        let running = self.tasks_running();
        if self.paused.load(Ordering::Acquire) {
            running == 0
        } else {
            running == 0 && self.ready.lock().is_empty()
        }
    }

    /// Block the caller until the ready queue and running set are empty (or, if paused, until
    /// nothing is running). Never touches the stop flag.
    pub(crate) fn wait_for_tasks(&self) {
        self.waiting.store(true, Ordering::Release);
        loop {
            if self.drained() {
                break;
            }
            let mut gate = self.done_gate.lock();
            if self.drained() {
                break;
            }
            // Bounded wait rather than an unconditional block: tasks_running()/ready.len() are
            // read outside `gate`, so a completion between that read and acquiring `gate` would
            // otherwise be a missed wakeup.
            let _ = self.c_done.wait_for(&mut gate, DONE_POLL_INTERVAL);
        }
        self.waiting.store(false, Ordering::Release);
    }
}
