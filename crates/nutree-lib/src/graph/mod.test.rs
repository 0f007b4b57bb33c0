use super::*;
use crate::feed::InMemoryFeed;
use crate::package::RootSource;
use crate::testing::{MAILKIT_TREE, at_least, identity, mailkit_feed, net5};

fn walker(feeds: Vec<InMemoryFeed>) -> DependencyWalker<InMemoryFeed> {
    DependencyWalker::new(FeedSession::new(feeds), WalkerConfig::default())
}

#[tokio::test]
async fn test_retrieve_uses_first_matching_feed() {
    let walker = walker(vec![
        InMemoryFeed::new("empty"),
        mailkit_feed("primary"),
        mailkit_feed("mirror"),
    ]);

    let found = walker
        .retrieve(&identity("MailKit", 2, 15, 0), &net5())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.identity().to_string(), "MailKit.2.15.0");
    assert_eq!(found.source_feed(), Some("primary"));
    assert_eq!(walker.session().feeds()[2].call_count(), 0);
}

#[tokio::test]
async fn test_retrieve_unknown_package() {
    let walker = walker(vec![mailkit_feed("nuget")]);

    let found = walker
        .retrieve(&identity("Nope", 1, 0, 0), &net5())
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_retrieve_requires_the_exact_version() {
    let walker = walker(vec![
        InMemoryFeed::new("nuget").with_package(identity("Root", 1, 1, 0), vec![]),
    ]);

    let found = walker
        .retrieve(&identity("Root", 1, 0, 0), &net5())
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_exclusive_prerelease_bound_resolves_to_next_label() {
    let version = |text: &str| text.parse::<crate::package::PackageVersion>().unwrap();
    let feed = InMemoryFeed::new("nuget")
        .with_package(
            identity("Root", 1, 0, 0),
            vec![crate::package::DependencyEdge::new(
                "Dep",
                "(1.0.0-beta, )".parse().unwrap(),
            )],
        )
        .with_package(PackageIdentity::new("Dep", version("1.0.0-beta")), vec![])
        .with_package(PackageIdentity::new("Dep", version("1.0.0-beta.2")), vec![]);
    let walker = walker(vec![feed]);

    let resolved = walker
        .resolve(
            &RootRequest::Identity(identity("Root", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        resolved.get("Dep").unwrap().identity().to_string(),
        "Dep.1.0.0-beta.2"
    );
}

#[tokio::test]
async fn test_tree_from_identity_root() {
    let walker = walker(vec![mailkit_feed("nuget")]);

    let tree = walker
        .tree(
            &RootRequest::Identity(identity("MailKit", 2, 15, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(walker.render(&tree), MAILKIT_TREE);
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let walker = walker(vec![mailkit_feed("nuget")]);
    let root = RootRequest::Identity(identity("MailKit", 2, 15, 0));

    let first = walker
        .resolve(&root, &net5(), &CancellationToken::new())
        .await
        .unwrap();
    let second = walker
        .resolve(&root, &net5(), &CancellationToken::new())
        .await
        .unwrap();

    let ids = |set: &ResolvedSet| -> Vec<String> {
        set.iter().map(|d| d.identity().to_string()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(
        walker.render(&walker.build_tree(first.root(), &first).unwrap()),
        walker.render(&walker.build_tree(second.root(), &second).unwrap())
    );
}

#[tokio::test]
async fn test_local_root_tree() {
    let walker = walker(vec![mailkit_feed("nuget")]);
    let local = Arc::new(
        PackageDescriptor::new(identity("MyApp", 0, 1, 0), net5())
            .with_dependencies(vec![at_least("System.Buffers", 4, 5, 1)]),
    );

    let tree = walker
        .tree(
            &RootRequest::Source(RootSource::LocalArtifact(Arc::clone(&local))),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(Arc::ptr_eq(tree.root().descriptor(), &local));
    assert_eq!(
        walker.render(&tree),
        "MyApp.0.1.0  {net5.0}\n    System.Buffers.4.5.1  [4.5.1, )\n"
    );
}

#[tokio::test]
async fn test_errors_keep_their_source_message() {
    let walker = walker(vec![InMemoryFeed::new("empty")]);

    let error = walker
        .resolve(
            &RootRequest::Identity(identity("Ghost", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, WalkError::Discovery { .. }));
    assert!(error.to_string().starts_with("Unable to resolve dependency Ghost"));
}
