use super::*;
use mockito::Server;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Payload {
    name: String,
}

#[test]
fn test_networking_manager_creation() {
    let manager = NetworkingManager::new(NetworkingConfig::default());
    assert!(manager.is_ok(), "Should create networking manager");
    assert!(manager.unwrap().config().user_agent.starts_with("nutree/"));
}

#[test]
fn test_zero_concurrency_rejected() {
    let config = NetworkingConfig {
        max_concurrent_requests: 0,
        ..Default::default()
    };
    assert!(matches!(
        NetworkingManager::new(config),
        Err(NetworkingError::InvalidConcurrency { count: 0 })
    ));
}

#[tokio::test]
async fn test_get_json_decodes_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/payload.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"MailKit"}"#)
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    let payload: Option<Payload> = manager
        .get_json(&format!("{}/payload.json", server.url()))
        .await
        .unwrap();

    assert_eq!(
        payload,
        Some(Payload {
            name: "MailKit".to_string()
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_json_not_found_is_none() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing.json")
        .with_status(404)
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    let payload: Option<Payload> = manager
        .get_json(&format!("{}/missing.json", server.url()))
        .await
        .unwrap();

    assert!(payload.is_none());
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/flaky.json")
        .with_status(503)
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    let error = manager
        .get_json::<Payload>(&format!("{}/flaky.json", server.url()))
        .await
        .unwrap_err();

    assert!(error.is_transient());
    assert!(error.to_string().contains("503"));
}

#[tokio::test]
async fn test_client_errors_are_permanent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/forbidden.json")
        .with_status(403)
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    let error = manager
        .get_json::<Payload>(&format!("{}/forbidden.json", server.url()))
        .await
        .unwrap_err();

    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_rate_limited_status_is_transient() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/limited.json")
        .with_status(429)
        .create_async()
        .await;

    let manager = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    let error = manager
        .get_json::<Payload>(&format!("{}/limited.json", server.url()))
        .await
        .unwrap_err();

    assert!(error.is_transient());
}
