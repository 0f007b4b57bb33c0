use super::*;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
struct FakeError {
    transient: bool,
}

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fake error (transient: {})", self.transient)
    }
}

impl Retryable for FakeError {
    fn is_transient(&self) -> bool {
        self.transient
    }
}

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries).with_backoff(BackoffConfig {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(5),
        multiplier: 2.0,
    })
}

#[test]
fn test_backoff_config_default() {
    let config = BackoffConfig::default();
    assert_eq!(config.initial, Duration::from_millis(200));
    assert_eq!(config.max, Duration::from_secs(5));
    assert_eq!(config.multiplier, 2.0);
}

#[test]
fn test_delay_grows_and_caps() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(0), Duration::from_millis(200));
    assert_eq!(policy.delay_for(1), Duration::from_millis(400));
    assert_eq!(policy.delay_for(2), Duration::from_millis(800));
    assert_eq!(policy.delay_for(10), Duration::from_secs(5));
}

#[tokio::test]
async fn test_retries_transient_until_success() {
    let calls = AtomicU32::new(0);
    let result: Result<u32, FakeError> = fast_policy(3)
        .run("flaky", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(FakeError { transient: true })
            } else {
                Ok(n)
            }
        })
        .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let calls = AtomicU32::new(0);
    let result: Result<(), FakeError> = fast_policy(2)
        .run("down", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FakeError { transient: true })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_permanent_errors_are_not_retried() {
    let calls = AtomicU32::new(0);
    let result: Result<(), FakeError> = fast_policy(5)
        .run("broken", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FakeError { transient: false })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_none_policy_runs_once() {
    let calls = AtomicU32::new(0);
    let _: Result<(), FakeError> = RetryPolicy::none()
        .run("once", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FakeError { transient: true })
        })
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
