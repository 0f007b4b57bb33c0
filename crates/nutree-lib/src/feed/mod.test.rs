use super::*;
use crate::networking::NetworkingConfig;
use crate::package::PackageVersion;

fn version(text: &str) -> PackageVersion {
    text.parse().unwrap()
}

fn hint(text: &str) -> PackageIdentity {
    PackageIdentity::new("Pkg", version(text))
}

#[test]
fn test_configured_feed_from_source() {
    let networking = NetworkingManager::new(NetworkingConfig::default()).unwrap();

    let http = ConfiguredFeed::from_source("https://api.nuget.org/v3/index.json", &networking);
    assert!(matches!(http, ConfiguredFeed::Http(_)));
    assert_eq!(http.name(), "https://api.nuget.org/v3/index.json");

    let local = ConfiguredFeed::from_source("/var/packages", &networking);
    assert!(matches!(local, ConfiguredFeed::Local(_)));
    assert_eq!(local.name(), "/var/packages");
}

#[test]
fn test_nearest_at_or_above() {
    let versions = [
        version("1.0.0"),
        version("1.5.0"),
        version("2.0.0-rc.1"),
        version("2.0.0"),
    ];
    let entries = || versions.iter().map(|v| (v, v.to_string()));

    assert_eq!(
        nearest_at_or_above(entries(), &hint("1.0.0")),
        Some("1.0.0".to_string())
    );
    assert_eq!(
        nearest_at_or_above(entries(), &hint("1.1.0")),
        Some("1.5.0".to_string())
    );
    assert_eq!(
        nearest_at_or_above(entries(), &hint("1.6.0")),
        Some("2.0.0".to_string())
    );
    assert_eq!(
        nearest_at_or_above(entries(), &hint("2.0.0-rc.1")),
        Some("2.0.0-rc.1".to_string())
    );
    assert_eq!(nearest_at_or_above(entries(), &hint("3.0.0")), None);
}

#[test]
fn test_feed_error_classification() {
    let transient = FeedError::Transient {
        feed: "a".to_string(),
        message: "503".to_string(),
    };
    let timeout = FeedError::Timeout {
        feed: "a".to_string(),
        after: Duration::from_secs(1),
    };
    let protocol = FeedError::Protocol {
        feed: "a".to_string(),
        message: "missing resource".to_string(),
    };

    assert!(transient.is_transient());
    assert!(timeout.is_transient());
    assert!(!protocol.is_transient());
    assert!(protocol.to_string().contains("missing resource"));
}

#[tokio::test]
async fn test_shared_feed_delegates() {
    let feed = Arc::new(
        InMemoryFeed::new("shared").with_package(hint("1.0.0"), vec![]),
    );
    let platform: Framework = "net5.0".parse().unwrap();

    let found = feed.resolve(&hint("1.0.0"), &platform).await.unwrap();
    assert!(found.is_some());
    assert_eq!(FeedClient::name(&feed), "shared");
    assert_eq!(feed.call_count(), 1);
}
