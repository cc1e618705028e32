//! Configuration model for the pool.

pub mod pool;

pub use pool::PoolConfig;
