//! Tests for configuration validation

use taskpool::config::PoolConfig;

#[test]
fn test_pool_config_default_is_valid() {
    let valid = PoolConfig::default();
    assert!(valid.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_stack_size() {
    let invalid = PoolConfig {
        thread_stack_size: Some(0),
        ..PoolConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_invalid_prefix() {
    let invalid = PoolConfig {
        thread_name_prefix: String::new(),
        ..PoolConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_from_json() {
    let json = r#"{
        "thread_count": 4,
        "thread_stack_size": 262144,
        "thread_name_prefix": "workers"
    }"#;

    let config = PoolConfig::from_json_str(json);
    assert!(config.is_ok());
    let config = config.unwrap();
    assert_eq!(config.thread_count, 4);
    assert_eq!(config.thread_name_prefix, "workers");
}

#[test]
fn test_pool_config_from_json_rejects_invalid() {
    let json = r#"{"thread_count": 1, "thread_stack_size": 0}"#;
    assert!(PoolConfig::from_json_str(json).is_err());
}
