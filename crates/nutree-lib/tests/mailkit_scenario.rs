//! End-to-end resolution of MailKit 2.15.0 for net5.0 over every feed kind

use mockito::ServerGuard;
use nutree_lib::feed::{ConfiguredFeed, FeedSession, InMemoryFeed, LocalFolderFeed};
use nutree_lib::graph::{DependencyWalker, RootRequest, WalkError, WalkerConfig};
use nutree_lib::networking::{BackoffConfig, NetworkingConfig, NetworkingManager, RetryPolicy};
use nutree_lib::package::{PackageDescriptor, RootSource};
use nutree_lib::testing::{
    MAILKIT_INSTALL_ORDER, MAILKIT_TREE, PackageDirFixture, identity, mailkit_feed, net5,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type Groups<'a> = &'a [(&'a str, &'a [(&'a str, &'a str)])];

/// The MailKit graph as `.nupkg` files, plus versions resolution must skip
fn write_mailkit_folder(fixture: &PackageDirFixture) {
    let packages: &[(&str, &str, Groups)] = &[
        (
            "MailKit",
            "2.15.0",
            &[
                ("net45", &[("MimeKit", "2.15.0"), ("System.Net.Http", "4.3.4")]),
                ("net5.0", &[("MimeKit", "2.15.0")]),
            ],
        ),
        (
            "MimeKit",
            "2.15.0",
            &[
                ("net45", &[("Portable.BouncyCastle", "1.8.10")]),
                (
                    "netstandard2.0",
                    &[
                        ("System.Security.Cryptography.Pkcs", "4.7.0"),
                        ("System.Reflection.TypeExtensions", "4.4.0"),
                        ("System.Text.Encoding.CodePages", "4.4.0"),
                        ("System.Buffers", "4.5.1"),
                        ("Portable.BouncyCastle", "1.8.10"),
                    ],
                ),
            ],
        ),
        ("MimeKit", "3.0.0", &[]),
        (
            "System.Security.Cryptography.Pkcs",
            "4.7.0",
            &[("netstandard2.0", &[("System.Security.Cryptography.Cng", "4.7.0")])],
        ),
        ("System.Security.Cryptography.Cng", "4.7.0", &[]),
        ("System.Security.Cryptography.Cng", "5.0.0", &[]),
        ("System.Reflection.TypeExtensions", "4.4.0", &[]),
        (
            "System.Text.Encoding.CodePages",
            "4.4.0",
            &[("netstandard2.0", &[("Microsoft.NETCore.Platforms", "2.0.0")])],
        ),
        ("Microsoft.NETCore.Platforms", "2.0.0", &[]),
        ("System.Buffers", "4.5.1", &[]),
        ("Portable.BouncyCastle", "1.8.10", &[]),
    ];

    for (id, version, groups) in packages {
        fixture
            .write_nupkg("feed", id, version, groups)
            .expect("write fixture package");
    }
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries).with_backoff(BackoffConfig {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(5),
        multiplier: 2.0,
    })
}

fn networking() -> NetworkingManager {
    NetworkingManager::new(NetworkingConfig::default()).expect("http client")
}

#[tokio::test]
async fn test_in_memory_feed_renders_expected_tree() {
    let walker = DependencyWalker::new(
        FeedSession::new(vec![mailkit_feed("nuget.org")]),
        WalkerConfig::default(),
    );
    let root = RootRequest::Identity(identity("MailKit", 2, 15, 0));
    let cancel = CancellationToken::new();

    let resolved = walker.resolve(&root, &net5(), &cancel).await.unwrap();
    let tree = walker.build_tree(resolved.root(), &resolved).unwrap();

    assert_eq!(resolved.len(), 9);
    let order: Vec<String> = resolved
        .install_order()
        .unwrap()
        .iter()
        .map(|d| d.summary())
        .collect();
    assert_eq!(order, MAILKIT_INSTALL_ORDER);
    assert_eq!(walker.render(&tree), MAILKIT_TREE);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let walker = DependencyWalker::new(
        FeedSession::new(vec![mailkit_feed("nuget.org")]),
        WalkerConfig { max_concurrent: 16 },
    );
    let root = RootRequest::Identity(identity("MailKit", 2, 15, 0));

    let mut renders = Vec::new();
    for _ in 0..3 {
        let tree = walker
            .tree(&root, &net5(), &CancellationToken::new())
            .await
            .unwrap();
        renders.push(walker.render(&tree));
    }

    assert!(renders.iter().all(|render| render == MAILKIT_TREE));
}

#[tokio::test]
async fn test_local_folder_feed_renders_expected_tree() {
    let fixture = PackageDirFixture::new().unwrap();
    write_mailkit_folder(&fixture);

    let feed = LocalFolderFeed::new(fixture.path().join("feed"));
    let walker = DependencyWalker::new(FeedSession::new(vec![feed]), WalkerConfig::default());

    let tree = walker
        .tree(
            &RootRequest::Identity(identity("MailKit", 2, 15, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(walker.render(&tree), MAILKIT_TREE);
    let mimekit = tree.get(tree.root().children()[0]).unwrap().descriptor();
    assert!(
        mimekit
            .download_location()
            .unwrap()
            .ends_with("mimekit.2.15.0.nupkg")
    );
}

#[tokio::test]
async fn test_local_nupkg_root_over_in_memory_feed() {
    let fixture = PackageDirFixture::new().unwrap();
    let path = fixture
        .write_nupkg(
            "",
            "MyTool",
            "1.0.0",
            &[
                ("net45", &[("Portable.BouncyCastle", "1.8.10")]),
                ("net5.0", &[("MailKit", "2.15.0"), ("System.Buffers", "4.5.1")]),
            ],
        )
        .unwrap();

    let descriptor = nutree_lib::artifact::LocalArtifactReader::new()
        .load_root(path, net5())
        .await
        .unwrap();
    let local: Arc<PackageDescriptor> = Arc::new(descriptor);

    let walker = DependencyWalker::new(
        FeedSession::new(vec![mailkit_feed("nuget.org")]),
        WalkerConfig::default(),
    );
    let tree = walker
        .tree(
            &RootRequest::Source(RootSource::LocalArtifact(Arc::clone(&local))),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let mailkit_subtree: String = MAILKIT_TREE
        .lines()
        .skip(1)
        .map(|line| format!("    {}\n", line))
        .collect();
    let expected = format!(
        "MyTool.1.0.0  {{net5.0}}\n    MailKit.2.15.0  [2.15.0, )\n{}    System.Buffers.4.5.1  [4.5.1, )\n",
        mailkit_subtree
    );

    assert!(Arc::ptr_eq(tree.root().descriptor(), &local));
    assert_eq!(walker.render(&tree), expected);
}

async fn mock_registration(server: &mut ServerGuard, id: &str, leaves: serde_json::Value) {
    let url = server.url();
    server
        .mock("GET", format!("/registration/{}/index.json", id.to_lowercase()).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "count": 1,
                "items": [{
                    "@id": format!("{}/registration/{}/index.json#page", url, id.to_lowercase()),
                    "lower": "0.0.0",
                    "upper": "99.0.0",
                    "items": leaves
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
}

fn http_leaf(url: &str, id: &str, version: &str, deps: &[(&str, &str)]) -> serde_json::Value {
    let dependencies: Vec<_> = deps
        .iter()
        .map(|(dep, range)| json!({ "id": dep, "range": range }))
        .collect();
    json!({
        "@id": format!("{}/registration/{}/{}.json", url, id.to_lowercase(), version),
        "catalogEntry": {
            "id": id,
            "version": version,
            "listed": true,
            "dependencyGroups": [{ "targetFramework": "net5.0", "dependencies": dependencies }]
        },
        "packageContent": format!("{}/flat/{}.{}.nupkg", url, id.to_lowercase(), version)
    })
}

#[tokio::test]
async fn test_http_feed_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/index.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "version": "3.0.0",
                "resources": [{ "@id": format!("{}/registration/", url), "@type": "RegistrationsBaseUrl/3.6.0" }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    mock_registration(
        &mut server,
        "App",
        json!([http_leaf(&url, "App", "1.0.0", &[("Lib", "[1.0.0, )"), ("Util", "[2.0.0, 3.0.0)")])]),
    )
    .await;
    mock_registration(
        &mut server,
        "Lib",
        json!([
            http_leaf(&url, "Lib", "1.0.0", &[("Util", "[2.1.0, )")]),
            http_leaf(&url, "Lib", "1.1.0", &[])
        ]),
    )
    .await;
    mock_registration(
        &mut server,
        "Util",
        json!([
            http_leaf(&url, "Util", "2.0.0", &[]),
            http_leaf(&url, "Util", "2.1.0", &[]),
            http_leaf(&url, "Util", "3.0.0", &[])
        ]),
    )
    .await;

    let feed = ConfiguredFeed::from_source(&format!("{}/index.json", url), &networking());
    let walker = DependencyWalker::new(
        FeedSession::new(vec![feed]).with_retry(fast_retry(1)),
        WalkerConfig::default(),
    );

    let retrieved = walker
        .retrieve(&identity("App", 1, 0, 0), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        retrieved.download_location(),
        Some(format!("{}/flat/app.1.0.0.nupkg", url).as_str())
    );

    let tree = walker
        .tree(
            &RootRequest::Source(RootSource::Feed(Arc::new(retrieved))),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        walker.render(&tree),
        "App.1.0.0  {net5.0}\n    Lib.1.0.0  [1.0.0, )\n        Util.2.1.0  [2.1.0, )\n    Util.2.1.0  [2.0.0, 3.0.0)\n"
    );
}

#[tokio::test]
async fn test_unavailable_http_feed_falls_back_to_local_folder() {
    let mut server = mockito::Server::new_async().await;
    let _outage = server
        .mock("GET", "/index.json")
        .with_status(503)
        .create_async()
        .await;

    let fixture = PackageDirFixture::new().unwrap();
    write_mailkit_folder(&fixture);

    let feeds = vec![
        ConfiguredFeed::from_source(&format!("{}/index.json", server.url()), &networking()),
        ConfiguredFeed::Local(LocalFolderFeed::new(fixture.path().join("feed"))),
    ];
    let walker = DependencyWalker::new(
        FeedSession::new(feeds).with_retry(fast_retry(1)),
        WalkerConfig::default(),
    );

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
async fn test_missing_dependency_fails_the_whole_resolution() {
    let feed = InMemoryFeed::new("partial")
        .with_package(
            identity("App", 1, 0, 0),
            vec![nutree_lib::testing::at_least("Missing", 1, 0, 0)],
        );
    let walker = DependencyWalker::new(FeedSession::new(vec![feed]), WalkerConfig::default());

    let error = walker
        .tree(
            &RootRequest::Identity(identity("App", 1, 0, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, WalkError::Discovery { .. }));
    assert!(error.to_string().contains("Missing"));
}
