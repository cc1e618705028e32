//! Builders that assemble a [`Pool`](crate::core::pool::Pool) from validated configuration.

pub mod pool_builder;

pub use pool_builder::PoolBuilder;
