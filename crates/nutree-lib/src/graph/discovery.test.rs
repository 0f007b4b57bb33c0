use super::*;
use crate::feed::InMemoryFeed;
use crate::networking::{BackoffConfig, RetryPolicy};
use crate::testing::{at_least, identity, mailkit_feed, net5};
use std::time::Duration;

fn session(feeds: Vec<InMemoryFeed>) -> FeedSession<InMemoryFeed> {
    FeedSession::new(feeds).with_retry(RetryPolicy::new(2).with_backoff(BackoffConfig {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(2),
        multiplier: 2.0,
    }))
}

fn ids(candidates: &CandidateSet) -> Vec<String> {
    candidates.iter().map(|d| d.identity().to_string()).collect()
}

#[test]
fn test_version_hint_follows_lower_bound() {
    let range: VersionRange = "[1.2.0, 2.0.0)".parse().unwrap();
    assert_eq!(version_hint(&range).to_string(), "1.2.0");

    let exclusive: VersionRange = "(1.2.0, )".parse().unwrap();
    assert_eq!(version_hint(&exclusive).to_string(), "1.2.0.1");

    let unbounded: VersionRange = "(, 2.0.0]".parse().unwrap();
    assert_eq!(version_hint(&unbounded), PackageVersion::zero());
}

#[test]
fn test_version_hint_skips_exclusive_prerelease_bound() {
    let range: VersionRange = "(1.0.0-beta, )".parse().unwrap();
    let hint = version_hint(&range);

    assert_eq!(hint.to_string(), "1.0.0-beta.0");
    assert!(range.satisfies(&hint));
    assert!(hint < "1.0.0-beta.2".parse().unwrap());
}

#[tokio::test]
async fn test_discovers_mailkit_graph() {
    let session = session(vec![mailkit_feed("nuget")]);
    let root = RootRequest::Identity(identity("MailKit", 2, 15, 0));

    let candidates = GraphDiscoverer::new(4)
        .discover(&session, &root, &net5(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        ids(&candidates),
        vec![
            "MailKit.2.15.0",
            "Microsoft.NETCore.Platforms.2.0.0",
            "MimeKit.2.15.0",
            "Portable.BouncyCastle.1.8.10",
            "System.Buffers.4.5.1",
            "System.Reflection.TypeExtensions.4.4.0",
            "System.Security.Cryptography.Cng.4.7.0",
            "System.Security.Cryptography.Pkcs.4.7.0",
            "System.Text.Encoding.CodePages.4.4.0",
        ]
    );
    assert_eq!(candidates.root().identity().to_string(), "MailKit.2.15.0");
    assert!(!candidates.root().is_local());
}

#[tokio::test]
async fn test_each_identity_is_fetched_once() {
    let feed = InMemoryFeed::new("diamond")
        .with_package(
            identity("Root", 1, 0, 0),
            vec![at_least("Left", 1, 0, 0), at_least("Right", 1, 0, 0)],
        )
        .with_package(identity("Left", 1, 0, 0), vec![at_least("Shared", 1, 0, 0)])
        .with_package(identity("Right", 1, 0, 0), vec![at_least("Shared", 1, 0, 0)])
        .with_package(identity("Shared", 1, 0, 0), vec![]);
    let session = session(vec![feed]);

    let candidates = GraphDiscoverer::new(8)
        .discover(
            &session,
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(candidates.len(), 4);
    // Root, Left, Right and Shared exactly once each
    assert_eq!(session.feeds()[0].call_count(), 4);
}

#[tokio::test]
async fn test_all_feeds_contribute_candidates() {
    let primary = InMemoryFeed::new("primary")
        .with_package(identity("Root", 1, 0, 0), vec![at_least("Dep", 1, 0, 0)])
        .with_package(identity("Dep", 1, 0, 0), vec![]);
    let mirror = InMemoryFeed::new("mirror")
        .with_package(identity("Dep", 1, 1, 0), vec![at_least("Extra", 1, 0, 0)])
        .with_package(identity("Extra", 1, 0, 0), vec![]);
    let session = session(vec![primary, mirror]);

    let candidates = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        ids(&candidates),
        vec!["Dep.1.0.0", "Dep.1.1.0", "Extra.1.0.0", "Root.1.0.0"]
    );
    let dep_versions: Vec<_> = candidates
        .versions_of("dep")
        .map(|d| d.identity().version().to_string())
        .collect();
    assert_eq!(dep_versions, vec!["1.0.0", "1.1.0"]);
}

#[tokio::test]
async fn test_zero_dependency_root() {
    let feed = InMemoryFeed::new("solo").with_package(identity("Solo", 1, 0, 0), vec![]);
    let session = session(vec![feed]);

    let candidates = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("Solo", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&candidates), vec!["Solo.1.0.0"]);
}

#[tokio::test]
async fn test_missing_dependency_is_unresolvable() {
    let feed = InMemoryFeed::new("partial")
        .with_package(identity("Root", 1, 0, 0), vec![at_least("Ghost", 2, 0, 0)]);
    let session = session(vec![feed]);

    let error = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match error {
        DiscoveryError::UnresolvableDependency {
            id,
            range,
            required_by,
            ..
        } => {
            assert_eq!(id, "Ghost");
            assert_eq!(range.to_string(), "[2.0.0, )");
            assert_eq!(required_by, "Root.1.0.0");
        }
        other => panic!("expected unresolvable dependency, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_root_is_unresolvable() {
    let feed = InMemoryFeed::new("empty").with_package(identity("Root", 1, 1, 0), vec![]);
    let session = session(vec![feed]);

    let error = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DiscoveryError::UnresolvableDependency { ref id, .. } if id == "Root"
    ));
}

#[tokio::test]
async fn test_exhausted_retries_escalate_to_unresolvable() {
    let feed = InMemoryFeed::new("down")
        .with_package(identity("Root", 1, 0, 0), vec![at_least("Flaky", 1, 0, 0)])
        .with_package(identity("Flaky", 1, 0, 0), vec![])
        .with_transient_failures("Flaky", 100);
    let session = session(vec![feed]);

    let error = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match error {
        DiscoveryError::UnresolvableDependency { id, reason, .. } => {
            assert_eq!(id, "Flaky");
            assert!(reason.contains("every feed failed"));
        }
        other => panic!("expected unresolvable dependency, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redundant_feed_covers_an_outage() {
    let down = InMemoryFeed::new("down")
        .with_package(identity("Root", 1, 0, 0), vec![at_least("Dep", 1, 0, 0)])
        .with_transient_failures("Dep", 100);
    let backup = InMemoryFeed::new("backup").with_package(identity("Dep", 1, 0, 0), vec![]);
    let session = session(vec![down, backup]);

    let candidates = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&candidates), vec!["Dep.1.0.0", "Root.1.0.0"]);
}

#[tokio::test]
async fn test_local_root_is_not_fetched_or_kept() {
    let feed = InMemoryFeed::new("feed")
        .with_package(identity("Local", 1, 0, 0), vec![at_least("Wrong", 1, 0, 0)])
        .with_package(identity("Dep", 1, 0, 0), vec![at_least("Local", 1, 0, 0)]);
    let session = session(vec![feed]);

    let local = Arc::new(
        PackageDescriptor::new(identity("Local", 1, 0, 0), net5())
            .with_dependencies(vec![at_least("Dep", 1, 0, 0)]),
    );
    let root = RootRequest::Source(RootSource::LocalArtifact(local));

    let candidates = GraphDiscoverer::default()
        .discover(&session, &root, &net5(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&candidates), vec!["Dep.1.0.0"]);
    assert!(candidates.root().is_local());
    // Only Dep is looked up; the edge back to Local hits the claimed root
    assert_eq!(session.feeds()[0].call_count(), 1);
}

#[tokio::test]
async fn test_feed_root_source_is_kept() {
    let feed = InMemoryFeed::new("feed").with_package(identity("Dep", 1, 0, 0), vec![]);
    let session = session(vec![feed]);

    let retrieved = Arc::new(
        PackageDescriptor::new(identity("Root", 1, 0, 0), net5())
            .with_dependencies(vec![at_least("Dep", 1, 0, 0)]),
    );
    let root = RootRequest::Source(RootSource::Feed(retrieved));

    let candidates = GraphDiscoverer::default()
        .discover(&session, &root, &net5(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&candidates), vec!["Dep.1.0.0", "Root.1.0.0"]);
}

#[tokio::test]
async fn test_cyclic_declarations_terminate() {
    let feed = InMemoryFeed::new("cyclic")
        .with_package(identity("A", 1, 0, 0), vec![at_least("B", 1, 0, 0)])
        .with_package(identity("B", 1, 0, 0), vec![at_least("A", 1, 0, 0)]);
    let session = session(vec![feed]);

    let candidates = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("A", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&candidates), vec!["A.1.0.0", "B.1.0.0"]);
}

#[tokio::test]
async fn test_cancellation_abandons_in_flight_lookups() {
    let feed = mailkit_feed("slow").with_latency(Duration::from_secs(30));
    let session = session(vec![feed]);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("MailKit", 2, 15, 0)),
            &net5(),
            &cancel,
        )
        .await;

    assert!(matches!(result, Err(DiscoveryError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_already_cancelled_token() {
    let session = session(vec![mailkit_feed("nuget")]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("MailKit", 2, 15, 0)),
            &net5(),
            &cancel,
        )
        .await;

    assert!(matches!(result, Err(DiscoveryError::Cancelled)));
    assert_eq!(session.feeds()[0].call_count(), 0);
}

#[tokio::test]
async fn test_discovery_is_deterministic_under_concurrency() {
    let feed = mailkit_feed("jittery").with_latency(Duration::from_millis(2));
    let session = session(vec![feed]);
    let root = RootRequest::Identity(identity("MailKit", 2, 15, 0));

    let sequential = GraphDiscoverer::new(1)
        .discover(&session, &root, &net5(), &CancellationToken::new())
        .await
        .unwrap();
    let concurrent = GraphDiscoverer::new(16)
        .discover(&session, &root, &net5(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&sequential), ids(&concurrent));
}
