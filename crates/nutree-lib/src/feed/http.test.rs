use super::*;
use crate::networking::NetworkingConfig;
use mockito::{Mock, ServerGuard};
use serde_json::json;

fn networking() -> NetworkingManager {
    NetworkingManager::new(NetworkingConfig::default()).unwrap()
}

fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, version.parse().unwrap())
}

fn net5() -> Framework {
    "net5.0".parse().unwrap()
}

async fn mock_json(server: &mut ServerGuard, path: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_service_index(server: &mut ServerGuard) -> Mock {
    let base = format!("{}/registration/", server.url());
    let body = json!({
        "version": "3.0.0",
        "resources": [
            { "@id": format!("{}/query", server.url()), "@type": "SearchQueryService" },
            { "@id": format!("{}/old/", server.url()), "@type": "RegistrationsBaseUrl" },
            { "@id": base, "@type": "RegistrationsBaseUrl/3.6.0" }
        ]
    });
    server
        .mock("GET", "/index.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

fn leaf(server_url: &str, id: &str, version: &str, groups: serde_json::Value) -> serde_json::Value {
    json!({
        "@id": format!("{}/registration/{}/{}.json", server_url, id.to_lowercase(), version),
        "catalogEntry": {
            "id": id,
            "version": version,
            "listed": true,
            "dependencyGroups": groups
        },
        "packageContent": format!(
            "{}/flatcontainer/{}/{}/{}.{}.nupkg",
            server_url,
            id.to_lowercase(),
            version,
            id.to_lowercase(),
            version
        )
    })
}

#[tokio::test]
async fn test_resolves_inline_registration_page() {
    let mut server = mockito::Server::new_async().await;
    let index = mock_service_index(&mut server).await;
    let url = server.url();

    mock_json(
        &mut server,
        "/registration/mailkit/index.json",
        json!({
            "count": 1,
            "items": [{
                "@id": format!("{}/registration/mailkit/index.json#page/1.0.0/2.15.0", url),
                "lower": "1.0.0",
                "upper": "2.15.0",
                "items": [
                    leaf(&url, "MailKit", "2.14.0", json!([])),
                    leaf(&url, "MailKit", "2.15.0", json!([
                        {
                            "targetFramework": ".NETFramework4.5",
                            "dependencies": [{ "id": "System.Net.Http", "range": "[4.3.4, )" }]
                        },
                        {
                            "targetFramework": "net5.0",
                            "dependencies": [{ "id": "MimeKit", "range": "[2.15.0, )" }]
                        }
                    ]))
                ]
            }]
        }),
    )
    .await;

    let feed = HttpFeed::new(format!("{}/index.json", url), networking());
    let found = feed
        .resolve(&identity("MailKit", "2.15.0"), &net5())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.to_string(), "MailKit.2.15.0 {net5.0}");
    let deps: Vec<_> = found.dependencies().iter().map(ToString::to_string).collect();
    assert_eq!(deps, vec!["MimeKit [2.15.0, )"]);
    assert_eq!(found.source_feed(), Some(feed.name()));
    assert!(
        found
            .download_location()
            .is_some_and(|location| location.ends_with("mailkit.2.15.0.nupkg"))
    );

    // Second lookup reuses the cached registration base
    let older = feed
        .resolve(&identity("MailKit", "2.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(older.identity().to_string(), "MailKit.2.14.0");
    index.assert_async().await;
}

#[tokio::test]
async fn test_fetches_pages_on_demand() {
    let mut server = mockito::Server::new_async().await;
    let _index = mock_service_index(&mut server).await;
    let url = server.url();

    mock_json(
        &mut server,
        "/registration/mimekit/index.json",
        json!({
            "count": 2,
            "items": [
                {
                    "@id": format!("{}/registration/mimekit/page/1.0.0/1.9.0.json", url),
                    "lower": "1.0.0",
                    "upper": "1.9.0"
                },
                {
                    "@id": format!("{}/registration/mimekit/page/2.0.0/3.0.0.json", url),
                    "lower": "2.0.0",
                    "upper": "3.0.0"
                }
            ]
        }),
    )
    .await;
    let skipped_page = server
        .mock("GET", "/registration/mimekit/page/1.0.0/1.9.0.json")
        .expect(0)
        .create_async()
        .await;
    mock_json(
        &mut server,
        "/registration/mimekit/page/2.0.0/3.0.0.json",
        json!({
            "items": [
                leaf(&url, "MimeKit", "2.15.0", json!([{
                    "targetFramework": ".NETStandard2.0",
                    "dependencies": [
                        { "id": "Portable.BouncyCastle", "range": "[1.8.10, )" },
                        { "id": "System.Buffers", "range": "[4.5.1, )" }
                    ]
                }])),
                leaf(&url, "MimeKit", "3.0.0", json!([]))
            ]
        }),
    )
    .await;

    let feed = HttpFeed::new(format!("{}/index.json", url), networking());
    let found = feed
        .resolve(&identity("MimeKit", "2.15.0"), &net5())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.identity().to_string(), "MimeKit.2.15.0");
    assert_eq!(found.dependencies().len(), 2);
    skipped_page.assert_async().await;
}

#[tokio::test]
async fn test_unpublished_package_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _index = mock_service_index(&mut server).await;
    let _missing = server
        .mock("GET", "/registration/nothing.here/index.json")
        .with_status(404)
        .create_async()
        .await;

    let feed = HttpFeed::new(format!("{}/index.json", server.url()), networking());
    let found = feed
        .resolve(&identity("Nothing.Here", "1.0.0"), &net5())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_unlisted_versions_only_match_exactly() {
    let mut server = mockito::Server::new_async().await;
    let _index = mock_service_index(&mut server).await;
    let url = server.url();

    let mut unlisted = leaf(&url, "Pkg", "1.1.0", json!([]));
    unlisted["catalogEntry"]["listed"] = json!(false);

    mock_json(
        &mut server,
        "/registration/pkg/index.json",
        json!({
            "items": [{
                "@id": format!("{}/registration/pkg/index.json#page", url),
                "lower": "1.1.0",
                "upper": "1.2.0",
                "items": [unlisted, leaf(&url, "Pkg", "1.2.0", json!([]))]
            }]
        }),
    )
    .await;

    let feed = HttpFeed::new(format!("{}/index.json", url), networking());
    let nearest = feed
        .resolve(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(nearest.identity().to_string(), "Pkg.1.2.0");

    let exact = feed
        .resolve(&identity("Pkg", "1.1.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(exact.identity().to_string(), "Pkg.1.1.0");
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let mut server = mockito::Server::new_async().await;
    let _index = mock_service_index(&mut server).await;
    let _down = server
        .mock("GET", "/registration/pkg/index.json")
        .with_status(503)
        .create_async()
        .await;

    let feed = HttpFeed::new(format!("{}/index.json", server.url()), networking());
    let error = feed
        .resolve(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap_err();
    assert!(error.is_transient());
}

#[tokio::test]
async fn test_service_index_without_registrations_is_protocol_error() {
    let mut server = mockito::Server::new_async().await;
    mock_json(
        &mut server,
        "/index.json",
        json!({ "version": "3.0.0", "resources": [] }),
    )
    .await;

    let feed = HttpFeed::new(format!("{}/index.json", server.url()), networking());
    let error = feed
        .resolve(&identity("Pkg", "1.0.0"), &net5())
        .await
        .unwrap_err();
    assert!(matches!(error, FeedError::Protocol { .. }));
    assert!(!error.is_transient());
}
