//! Small ambient helpers that don't belong to a specific core module.

pub mod telemetry;

pub use telemetry::*;
