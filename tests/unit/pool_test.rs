//! Integration tests for the `Pool` facade, driven through the public crate root rather than
//! the in-module tests in `core::pool`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskpool::builders::PoolBuilder;
use taskpool::config::PoolConfig;
use taskpool::core::Pool;

#[test]
fn many_independent_tasks_all_complete_on_a_small_pool() {
    let pool = Pool::new(4);
    let counter = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..200)
        .map(|_| {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        handle.wait();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 200);
    assert_eq!(pool.get_tasks_total(), 0);
}

#[test]
fn chained_deferred_arguments_form_a_dependency_graph() {
    let pool = Pool::new(3);
    let a = pool.submit(|| 1);
    let b = pool.submit(|| 2);
    let sum = pool.submit_with_args2(|x: i32, y: i32| x + y, a, b);
    let doubled = pool.submit_with_arg(|s: i32| s * 2, sum);
    assert_eq!(doubled.get().unwrap(), 6);
}

#[test]
fn pool_constructed_from_builder_with_config_runs_work() {
    let config = PoolConfig::from_json_str(r#"{"thread_count": 2, "thread_name_prefix": "itest"}"#)
        .expect("config parses");
    let pool = PoolBuilder::with_config(config)
        .build()
        .expect("builds from valid config");

    let handle = pool.submit(|| "done");
    assert_eq!(handle.get().unwrap(), "done");
    assert_eq!(pool.get_thread_count(), 2);
}

#[test]
fn wait_for_tasks_blocks_until_backlog_drains() {
    let pool = Pool::new(2);
    for _ in 0..20 {
        pool.submit(|| {
            std::thread::sleep(Duration::from_millis(1));
        });
    }
    pool.wait_for_tasks();
    assert_eq!(pool.get_tasks_queued(), 0);
    assert_eq!(pool.get_tasks_running(), 0);
}

#[test]
fn reset_preserves_pause_state_across_rebuild() {
    let pool = Pool::new(2);
    pool.pause();
    pool.reset(1);
    assert!(pool.is_paused());
    pool.unpause();
    assert!(!pool.is_paused());
}
