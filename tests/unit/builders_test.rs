//! Tests for builder modules

use taskpool::builders::PoolBuilder;
use taskpool::config::PoolConfig;
use taskpool::core::PoolError;

#[test]
fn test_pool_builder_defaults() {
    let pool = PoolBuilder::new().build().unwrap();
    assert!(pool.get_thread_count() >= 1);
}

#[test]
fn test_pool_builder_explicit_thread_count() {
    let pool = PoolBuilder::new().thread_count(3).build().unwrap();
    assert_eq!(pool.get_thread_count(), 3);
}

#[test]
fn test_pool_builder_rejects_invalid_config() {
    let result = PoolBuilder::new().thread_stack_size(0).build();
    assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
}

#[test]
fn test_pool_builder_with_config_from_json() {
    let config = PoolConfig::from_json_str(r#"{"thread_count": 2}"#).unwrap();
    let pool = PoolBuilder::with_config(config).build().unwrap();
    assert_eq!(pool.get_thread_count(), 2);
}

#[test]
fn test_pool_builder_thread_name_prefix() {
    let pool = PoolBuilder::new()
        .thread_name_prefix("custom-worker")
        .build()
        .unwrap();
    assert!(pool.get_thread_count() >= 1);
}
