//! Smoke tests for the public surface of the gateway

use std::net::TcpListener;
use std::sync::Arc;

use token_gateway::auth::{HttpCredentialCheck, SessionAuthenticator, SystemClock};
use token_gateway::configuration::AuthSettings;
use token_gateway::startup::run;

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let settings = AuthSettings {
        secret_key: "health-check-secret-key-32-characters".to_string(),
        algorithm: "HS256".to_string(),
        access_token_expire_minutes: 30,
        refresh_token_expire_days: 7,
        require_refresh_kind: false,
    };
    let credentials = HttpCredentialCheck::new(
        "http://127.0.0.1:9/users/exists".to_string(),
        std::time::Duration::from_millis(200),
    )
    .unwrap();
    let authenticator = SessionAuthenticator::new(&settings, Arc::new(SystemClock), credentials)
        .expect("Failed to build authenticator");

    let server = run(listener, authenticator).expect("Failed to create server");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/does-not-exist", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}
