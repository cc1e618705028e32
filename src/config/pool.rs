//! Pool configuration.

use serde::{Deserialize, Serialize};

use crate::core::error::PoolError;

/// Validated configuration for constructing a [`Pool`](crate::core::pool::Pool) through a
/// [`PoolBuilder`](crate::builders::PoolBuilder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads. `0` means "use hardware concurrency, falling back to 1".
    pub thread_count: u32,
    /// Stack size for each worker thread, in bytes. `None` uses the platform default.
    #[serde(default)]
    pub thread_stack_size: Option<usize>,
    /// Prefix used to name worker threads (`"{prefix}-{index}"`), useful in panic messages and
    /// profilers.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_thread_name_prefix() -> String {
    "taskpool-worker".to_string()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            thread_count: 0,
            thread_stack_size: None,
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl PoolConfig {
    /// Validate this configuration. A zero `thread_stack_size` is nonsensical (the OS minimum
    /// stack is always larger); `thread_count` has no upper bound to validate since `0` is a
    /// meaningful "auto" sentinel.
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.thread_stack_size, Some(0)) {
            return Err("thread_stack_size must be greater than 0 when set".into());
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err("thread_name_prefix must not be empty".into());
        }
        Ok(())
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let cfg: PoolConfig = serde_json::from_str(input)
            .map_err(|e| PoolError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()
            .map_err(PoolError::InvalidConfig)?;
        Ok(cfg)
    }
}
