//! `pool | f1 | f2 | f3` pipeline convenience built on top of [`Pool::submit`] and
//! [`Pool::submit_with_arg`].

use std::ops::BitOr;

use crate::core::error::PoolError;
use crate::core::pool::Pool;
use crate::core::result_handle::ResultHandle;

/// One stage of a pipeline: a pending [`ResultHandle`] plus the pool that produced it, so the
/// next `|` can submit a follow-up stage.
///
/// Dropping a `Pipe` without consuming it blocks until its stage resolves — pipelines have
/// value semantics, not fire-and-forget semantics.
pub struct Pipe<'p, T> {
    pool: &'p Pool,
    handle: Option<ResultHandle<T>>,
}

impl<'p, T> Pipe<'p, T> {
    /// Consume the pipe and return its underlying handle without waiting here.
    #[must_use]
    pub fn into_handle(mut self) -> ResultHandle<T> {
        self.handle.take().expect("handle present until drop")
    }

    /// Block for this stage's outcome, consuming the pipe.
    pub fn get(self) -> Result<T, PoolError> {
        self.into_handle().get()
    }
}

impl<T> Drop for Pipe<'_, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.wait();
        }
    }
}

impl<'p, F, R> BitOr<F> for &'p Pool
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    type Output = Pipe<'p, R>;

    fn bitor(self, stage: F) -> Pipe<'p, R> {
        Pipe {
            pool: self,
            handle: Some(self.submit(stage)),
        }
    }
}

impl<'p, T, F, R> BitOr<F> for Pipe<'p, T>
where
    T: Send + 'static,
    F: FnOnce(T) -> R + Send + 'static,
    R: Send + 'static,
{
    type Output = Pipe<'p, R>;

    fn bitor(mut self, stage: F) -> Pipe<'p, R> {
        let prev = self.handle.take().expect("handle present until drop");
        Pipe {
            pool: self.pool,
            handle: Some(self.pool.submit_with_arg(stage, prev)),
        }
    }
}
