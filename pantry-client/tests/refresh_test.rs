mod common;

use std::time::Duration;

use common::*;
use pantry_client::auth::{LogoutReason, TokenKind, TokenStore};
use pantry_client::ApiError;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn concurrent_expired_calls_share_a_single_refresh() {
    let app = TestApp::spawn().await;
    app.seed_tokens(&expired_jwt(), "R");
    let fresh = valid_jwt();

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh": "R"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": fresh}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inventory"))
        .and(header("Authorization", format!("Bearer {}", fresh).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&app.server)
        .await;

    let (a, b, c) = tokio::join!(
        app.client.inventory.list(),
        app.client.inventory.list(),
        app.client.inventory.list(),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(app.store.get(TokenKind::Access), Some(fresh));
}

#[tokio::test]
async fn refresh_failure_clears_tokens_and_signals_once() {
    let app = TestApp::spawn().await;
    app.seed_tokens(&expired_jwt(), "R");
    let mut logout = app.client.subscribe_logout();

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Refresh token revoked"})),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let err = app.client.inventory.list().await.unwrap_err();

    assert!(matches!(err, ApiError::RefreshFailed));
    assert_eq!(err.status(), Some(401));
    assert_eq!(app.store.get(TokenKind::Access), None);
    assert_eq!(app.store.get(TokenKind::Refresh), None);

    let event = logout.recv().await.unwrap();
    assert_eq!(event.reason, LogoutReason::RefreshFailed);
    assert!(matches!(logout.try_recv(), Err(TryRecvError::Empty)));

    // Only the refresh call went out; the original request was never sent.
    let requests = app.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/auth/refresh");
}

#[tokio::test]
async fn expired_token_without_refresh_token_never_hits_the_network() {
    let app = TestApp::spawn().await;
    app.store.set(TokenKind::Access, expired_jwt());
    let mut logout = app.client.subscribe_logout();

    let err = app.client.inventory.list().await.unwrap_err();

    assert!(matches!(err, ApiError::AuthenticationRequired));
    assert!(app.server.received_requests().await.unwrap().is_empty());
    // Nothing failed remotely, so no forced-logout broadcast either.
    assert!(matches!(logout.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn near_expiry_token_is_refreshed_proactively() {
    let app = TestApp::spawn().await;
    app.seed_tokens(&expiring_soon_jwt(), "R");
    let fresh = valid_jwt();

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": fresh})))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inventory"))
        .and(header("Authorization", format!("Bearer {}", fresh).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.client.inventory.list().await.unwrap();
}

#[tokio::test]
async fn failed_proactive_refresh_degrades_to_current_token() {
    let app = TestApp::spawn().await;
    let current = expiring_soon_jwt();
    app.seed_tokens(&current, "R");
    let mut logout = app.client.subscribe_logout();

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&app.server)
        .await;

    // The still-valid current token carries the request through.
    Mock::given(method("GET"))
        .and(path("/inventory"))
        .and(header("Authorization", format!("Bearer {}", current).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    let items = app.client.inventory.list().await.unwrap();
    assert!(items.is_empty());

    // The failed refresh cycle still tore the session down for later calls.
    assert_eq!(app.store.get(TokenKind::Access), None);
    let event = logout.recv().await.unwrap();
    assert_eq!(event.reason, LogoutReason::RefreshFailed);
}

#[tokio::test]
async fn refresh_outcome_is_not_reused_across_cycles() {
    let app = TestApp::spawn().await;
    app.seed_tokens(&expired_jwt(), "R");
    let fresh = valid_jwt();

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": fresh})))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&app.server)
        .await;

    // First call refreshes; the second finds a valid token and does not.
    app.client.inventory.list().await.unwrap();
    app.client.inventory.list().await.unwrap();
}
