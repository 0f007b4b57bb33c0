use super::*;

fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, version.parse().unwrap())
}

fn edge(id: &str, range: &str) -> DependencyEdge {
    DependencyEdge::new(id, range.parse().unwrap())
}

fn net5() -> Framework {
    "net5.0".parse().unwrap()
}

fn feed() -> InMemoryFeed {
    InMemoryFeed::new("memory")
        .with_package(identity("Dep", "1.0.0"), vec![])
        .with_package(identity("Dep", "1.2.0"), vec![edge("Leaf", "2.0")])
        .with_package(identity("Dep", "1.3.0-beta"), vec![])
        .with_package(identity("Dep", "2.0.0"), vec![])
}

#[tokio::test]
async fn test_exact_hint_is_returned() {
    let found = feed()
        .resolve(&identity("dep", "1.2.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.to_string(), "Dep.1.2.0 {net5.0}");
    assert_eq!(found.dependencies(), &[edge("Leaf", "2.0")]);
    assert_eq!(found.source_feed(), Some("memory"));
}

#[tokio::test]
async fn test_lowest_release_above_hint() {
    let found = feed()
        .resolve(&identity("Dep", "1.2.1"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.identity().to_string(), "Dep.2.0.0");
}

#[tokio::test]
async fn test_prerelease_hint_accepts_prereleases() {
    let found = feed()
        .resolve(&identity("Dep", "1.3.0-alpha"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.identity().to_string(), "Dep.1.3.0-beta");
}

#[tokio::test]
async fn test_unknown_or_too_high_is_none() {
    let feed = feed();
    assert!(
        feed.resolve(&identity("Missing", "1.0.0"), &net5())
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        feed.resolve(&identity("Dep", "3.0.0"), &net5())
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(feed.call_count(), 2);
}

#[tokio::test]
async fn test_transient_failures_are_consumed() {
    let feed = feed().with_transient_failures("DEP", 2);

    for _ in 0..2 {
        let error = feed
            .resolve(&identity("Dep", "1.0.0"), &net5())
            .await
            .unwrap_err();
        assert!(error.is_transient());
    }

    assert!(
        feed.resolve(&identity("Dep", "1.0.0"), &net5())
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(feed.call_count(), 3);
}

#[tokio::test]
async fn test_groups_are_selected_for_platform() {
    let feed = InMemoryFeed::new("memory").with_groups(
        identity("Multi", "1.0.0"),
        vec![
            DependencyGroup::new("net461".parse().unwrap(), vec![edge("Old", "1.0")]),
            DependencyGroup::new("netstandard2.0".parse().unwrap(), vec![edge("New", "1.0")]),
        ],
    );

    let found = feed
        .resolve(&identity("Multi", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.dependencies(), &[edge("New", "1.0")]);
}
