//! Build a [`Pool`] from a [`PoolConfig`], validating first.

use crate::config::PoolConfig;
use crate::core::error::PoolError;
use crate::core::pool::Pool;

/// Assembles a [`Pool`] from a [`PoolConfig`], the ceremony-with-validation counterpart to
/// [`Pool::new`].
#[derive(Debug, Clone, Default)]
pub struct PoolBuilder {
    config: PoolConfig,
}

impl PoolBuilder {
    /// Start from the default configuration (auto-detected thread count).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit configuration.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        Self { config }
    }

    /// Override the worker thread count.
    #[must_use]
    pub fn thread_count(mut self, n: u32) -> Self {
        self.config.thread_count = n;
        self
    }

    /// Override the worker thread stack size.
    #[must_use]
    pub fn thread_stack_size(mut self, bytes: usize) -> Self {
        self.config.thread_stack_size = Some(bytes);
        self
    }

    /// Override the worker thread name prefix.
    #[must_use]
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Validate the accumulated configuration and construct the pool.
    pub fn build(self) -> Result<Pool, PoolError> {
        self.config
            .validate()
            .map_err(PoolError::InvalidConfig)?;
        Ok(Pool::from_config(&self.config))
    }
}
