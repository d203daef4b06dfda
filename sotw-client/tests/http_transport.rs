//! End-to-end checks over a real HTTP transport against a mock API server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::user;
use pretty_assertions::assert_eq;
use serde_json::json;
use sotw_client::app::AppState;
use sotw_client::domains::SessionStore;
use sotw_client::infrastructure::ReqwestTransport;
use sotw_client::infrastructure::testing::fixtures;
use sotw_client::{ActionError, App, Fetch};
use sotw_config::ClientConfig;
use sotw_model::{LoginCredentials, SotwCreate, SotwId};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_base_url: Url::parse(&server.uri()).unwrap(),
        ..ClientConfig::default()
    }
}

fn signed_in_app(config: ClientConfig, member_of: &[i64]) -> App {
    let transport = ReqwestTransport::from_config(&config).unwrap();
    let state = AppState::with_session(SessionStore::authenticated(user(1, member_of)));
    App::with_state(config, Arc::new(transport), state)
}

#[tokio::test]
async fn test_create_group_surfaces_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sotw/"))
        .and(body_string_contains("\"name\""))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "name too long"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = signed_in_app(config_for(&server), &[]);

    let form = SotwCreate {
        name: "x".repeat(300),
        survey_datetime: Utc.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap(),
        results_datetime: Utc.with_ymd_and_hms(2024, 1, 8, 18, 0, 0).unwrap(),
        playlist_link: None,
    };
    let err = app.groups().create(&form).await.unwrap_err();

    assert_eq!(
        err,
        ActionError::Failed {
            message: "name too long".into(),
            cause: Some(400),
        }
    );
    assert_eq!(app.state().group.current(), None);
    assert_eq!(app.navigator().current_path(), None);
}

#[tokio::test]
async fn test_login_is_form_encoded_and_cookie_is_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=user1%40example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly")
                .set_body_json(fixtures::user_json(1, &[])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/current_user"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::user_json(1, &[42])))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::new(config_for(&server)).unwrap();
    app.session()
        .login(&LoginCredentials::new("user1@example.com", "pw"))
        .await
        .unwrap();
    let refreshed = app.start().await.unwrap();

    assert!(refreshed.is_member_of(SotwId(42)));
    assert!(app.state().session.is_member_of(SotwId(42)));
}

#[tokio::test]
async fn test_unauthorized_over_http_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sotw/42"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200})))
        .expect(1)
        .mount(&server)
        .await;
    let app = signed_in_app(config_for(&server), &[42]);

    app.visit("/sotw/42").await.unwrap();

    assert!(!app.state().session.is_authenticated());
    assert_eq!(app.navigator().current_path().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_request_timeout_is_a_failed_read_without_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sotw/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::sotw_json(42, "Office"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let config = ClientConfig {
        request_timeout: Some(Duration::from_millis(100)),
        ..config_for(&server)
    };
    let app = signed_in_app(config, &[42]);

    let fetched = app.groups().fetch(SotwId(42)).await;

    assert_eq!(fetched, Fetch::Failed { status: None });
    assert_eq!(app.state().group.current(), None);
    assert!(app.state().session.is_authenticated());
}
