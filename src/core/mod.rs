//! Core scheduling abstractions: stop tokens, deferred arguments, envelopes, the dual-queue
//! scheduler, and the pool facade built on top of them.

pub mod allocator;
pub mod deferred;
pub mod error;
pub(crate) mod envelope;
pub mod pool;
pub(crate) mod scheduler;
pub mod result_handle;
pub mod stop_token;

pub use allocator::{CountingAllocator, TaskAllocator};
pub use deferred::{Deferred, FutureLike, WaitStatus};
pub use error::{AppResult, PoolError};
pub use pool::Pool;
pub use result_handle::ResultHandle;
pub use stop_token::{StopFlag, StopToken};
