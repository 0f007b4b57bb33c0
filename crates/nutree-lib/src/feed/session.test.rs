use super::*;
use crate::feed::InMemoryFeed;
use crate::networking::BackoffConfig;
use std::sync::Arc;

fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, version.parse().unwrap())
}

fn net5() -> Framework {
    "net5.0".parse().unwrap()
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries).with_backoff(BackoffConfig {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(2),
        multiplier: 2.0,
    })
}

#[tokio::test]
async fn test_resolve_first_respects_feed_order() {
    let primary = InMemoryFeed::new("primary").with_package(identity("Pkg", "1.0.0"), vec![]);
    let secondary = InMemoryFeed::new("secondary").with_package(identity("Pkg", "1.0.0"), vec![]);
    let session = FeedSession::new(vec![primary, secondary]);

    let found = session
        .resolve_first(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.source_feed(), Some("primary"));
    assert_eq!(session.feeds()[1].call_count(), 0);
}

#[tokio::test]
async fn test_resolve_first_falls_through_to_later_feeds() {
    let empty = InMemoryFeed::new("empty");
    let secondary = InMemoryFeed::new("secondary").with_package(identity("Pkg", "1.0.0"), vec![]);
    let session = FeedSession::new(vec![empty, secondary]);

    let found = session
        .resolve_first(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.source_feed(), Some("secondary"));
}

#[tokio::test]
async fn test_resolve_exact_skips_nearby_versions() {
    let newer = InMemoryFeed::new("newer").with_package(identity("Pkg", "1.1.0"), vec![]);
    let exact = InMemoryFeed::new("exact").with_package(identity("Pkg", "1.0.0"), vec![]);
    let session = FeedSession::new(vec![newer, exact]);

    let nearest = session
        .resolve_first(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(nearest.identity().to_string(), "Pkg.1.1.0");

    let found = session
        .resolve_exact(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.identity().to_string(), "Pkg.1.0.0");
    assert_eq!(found.source_feed(), Some("exact"));
}

#[tokio::test]
async fn test_resolve_exact_without_exact_version() {
    let feed = InMemoryFeed::new("newer").with_package(identity("Pkg", "1.1.0"), vec![]);
    let session = FeedSession::new(vec![feed]);

    let found = session
        .resolve_exact(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_resolve_all_unions_and_deduplicates() {
    let a = InMemoryFeed::new("a").with_package(identity("Pkg", "1.0.0"), vec![]);
    let b = InMemoryFeed::new("b")
        .with_package(identity("pkg", "1.0.0"), vec![])
        .with_package(identity("Pkg", "1.1.0"), vec![]);
    let c = InMemoryFeed::new("c").with_package(identity("Pkg", "1.1.0"), vec![]);
    let session = FeedSession::new(vec![a, c, b]);

    let found = session
        .resolve_all(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap();

    let rendered: Vec<_> = found
        .iter()
        .map(|d| format!("{} from {}", d.identity(), d.source_feed().unwrap_or("?")))
        .collect();
    assert_eq!(rendered, vec!["Pkg.1.0.0 from a", "Pkg.1.1.0 from c"]);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let flaky = Arc::new(
        InMemoryFeed::new("flaky")
            .with_package(identity("Pkg", "1.0.0"), vec![])
            .with_transient_failures("Pkg", 2),
    );
    let session = FeedSession::new(vec![Arc::clone(&flaky)]).with_retry(fast_retry(3));

    let found = session
        .resolve_first(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap();

    assert!(found.is_some());
    assert_eq!(flaky.call_count(), 3);
}

#[tokio::test]
async fn test_exhausted_feed_is_skipped_when_another_has_the_package() {
    let down = InMemoryFeed::new("down")
        .with_package(identity("Pkg", "1.0.0"), vec![])
        .with_transient_failures("Pkg", 100);
    let backup = InMemoryFeed::new("backup").with_package(identity("Pkg", "1.0.0"), vec![]);
    let session = FeedSession::new(vec![down, backup]).with_retry(fast_retry(1));

    let all = session
        .resolve_all(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source_feed(), Some("backup"));

    let first = session
        .resolve_first(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.source_feed(), Some("backup"));
}

#[tokio::test]
async fn test_exhausted_feeds_surface_last_error() {
    let down = InMemoryFeed::new("down").with_transient_failures("Pkg", 100);
    let session = FeedSession::new(vec![down]).with_retry(fast_retry(2));

    let error = session
        .resolve_all(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap_err();
    assert!(error.is_transient());
    assert_eq!(session.feeds()[0].call_count(), 3);
}

#[tokio::test]
async fn test_slow_feed_times_out() {
    let slow = InMemoryFeed::new("slow")
        .with_package(identity("Pkg", "1.0.0"), vec![])
        .with_latency(Duration::from_millis(200));
    let session = FeedSession::new(vec![slow])
        .with_retry(RetryPolicy::none())
        .with_call_timeout(Duration::from_millis(10));

    let error = session
        .resolve_first(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap_err();
    assert!(matches!(error, FeedError::Timeout { .. }));
}
