//! # taskpool
//!
//! A general-purpose, in-process task pool: a fixed-size worker fleet that accepts callable
//! units of work, runs them concurrently, and returns awaitable handles to their results.
//!
//! The hard engineering lives in the scheduling core: a worker-thread protocol built around a
//! two-stage queue that lets tasks declare data dependencies on not-yet-resolved results without
//! parking a worker, a cooperative-cancellation mechanism, and a full lifecycle protocol (pause,
//! resume, reset, abort, destruction).
//!
//! ## Quick example
//!
//! ```rust
//! use taskpool::core::Pool;
//!
//! let pool = Pool::new(2);
//! let fa = pool.submit(|| 42);
//! let fb = pool.submit_with_arg(|x: i32| x + 1, fa);
//! assert_eq!(fb.get().unwrap(), 43);
//! ```
//!
//! ## Layout
//!
//! - [`core`] — stop tokens, deferred arguments, the task envelope, the dual-queue scheduler,
//!   and the [`core::Pool`] facade.
//! - [`config`] — [`config::PoolConfig`], validated and loadable from JSON.
//! - [`builders`] — [`builders::PoolBuilder`], the config-driven counterpart to `Pool::new`.
//! - [`pipe`] — `pool | f1 | f2 | f3` pipeline composition.
//! - [`mutex`], [`condvar`], [`rwlock`], [`once`] — thin, documented `parking_lot` wrappers the
//!   scheduler itself is built on.
//! - [`util::telemetry`] — `tracing` subscriber bootstrap.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and the pool facade.
pub mod core;
/// Configuration model for the pool.
pub mod config;
/// Builders to construct a pool from configuration.
pub mod builders;
/// Pipeline composition (`pool | f1 | f2 | f3`).
pub mod pipe;
/// Shared utilities (telemetry bootstrap).
pub mod util;

/// A `parking_lot`-backed condition variable with bounded-wait helpers.
pub mod condvar;
/// A `parking_lot`-backed mutex.
pub mod mutex;
/// A `parking_lot`-backed one-time initialization primitive.
pub mod once;
/// A `parking_lot`-backed reader-writer lock.
pub mod rwlock;

pub use condvar::{Condvar, WaitTimeoutResult};
pub use mutex::{MappedMutexGuard, Mutex, MutexGuard};
pub use once::{Once, OnceCell};
pub use rwlock::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard,
    RwLockUpgradableReadGuard, RwLockWriteGuard,
};
