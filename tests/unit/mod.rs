//! Unit tests for individual components, run as an integration test binary.

mod builders_test;
mod config_test;
mod error_test;
mod pool_test;
