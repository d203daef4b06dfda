mod common;

use common::TestApp;
use pretty_assertions::assert_eq;
use serde_json::json;
use sotw_client::ActionError;
use sotw_client::infrastructure::RequestBody;
use sotw_client::infrastructure::testing::fixtures;
use sotw_model::{RegisterForm, UserUpdate};

fn form() -> RegisterForm {
    RegisterForm {
        email: "new@example.com".into(),
        name: "New".into(),
        password: "s3cret".into(),
    }
}

#[tokio::test]
async fn test_logout_when_signed_out_is_a_no_op() {
    let harness = TestApp::signed_out();

    harness.app.session().logout().await;
    harness.app.session().logout().await;

    assert!(!harness.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let harness = TestApp::signed_in(&[42]);
    harness.stub.forget("GET", "auth/logout");
    harness
        .stub
        .fail("GET", "auth/logout", "connection reset by peer");

    harness.app.session().logout().await;

    assert!(!harness.is_authenticated());
}

#[tokio::test]
async fn test_register_then_login_with_same_credentials() {
    let harness = TestApp::signed_out();
    harness
        .stub
        .reply_json("POST", "auth/register", 201, fixtures::user_json(5, &[]));
    harness
        .stub
        .reply_json("POST", "auth/login", 200, fixtures::user_json(5, &[]));

    let visit = harness.app.register(&form()).await.unwrap();

    assert_eq!(harness.started(), vec!["auth/register", "auth/login"]);
    let login = &harness.stub.requests()[1];
    assert_eq!(
        login.body,
        Some(RequestBody::Form(vec![
            ("username".into(), "new@example.com".into()),
            ("password".into(), "s3cret".into()),
        ]))
    );
    assert!(harness.is_authenticated());
    assert_eq!(visit.navigation.route().full_path, "/");
}

#[tokio::test]
async fn test_register_failure_skips_login() {
    let harness = TestApp::signed_out();
    harness.stub.reply_json(
        "POST",
        "auth/register",
        400,
        json!({"detail": "User with this email already exists"}),
    );

    let err = harness.app.session().register(&form()).await.unwrap_err();

    assert_eq!(
        err,
        ActionError::Failed {
            message: "User with this email already exists".into(),
            cause: Some(400),
        }
    );
    assert_eq!(harness.stub.calls_to("POST", "auth/login"), 0);
    assert!(!harness.is_authenticated());
}

#[tokio::test]
async fn test_current_user_failure_is_not_authoritative() {
    let harness = TestApp::signed_in(&[42]);
    harness
        .stub
        .reply_json("GET", "auth/current_user", 502, json!({"detail": "Bad gateway"}));
    harness.stub.fail("GET", "auth/current_user", "timed out");

    assert_eq!(harness.app.start().await, None);
    assert!(harness.is_authenticated());

    assert_eq!(harness.app.session().get_current_user().await, None);
    assert!(harness.is_authenticated());
}

#[tokio::test]
async fn test_start_restores_session_from_cookie() {
    let harness = TestApp::signed_out();
    harness
        .stub
        .reply_json("GET", "auth/current_user", 200, fixtures::user_json(9, &[3]));

    let user = harness.app.start().await.unwrap();

    assert_eq!(user.id.get(), 9);
    assert!(harness.app.state().session.is_member_of(sotw_model::SotwId(3)));
}

#[tokio::test]
async fn test_update_user_replaces_identity() {
    let harness = TestApp::signed_in(&[42]);
    let mut renamed = fixtures::user_json(1, &[42]);
    renamed["name"] = json!("Renamed");
    harness.stub.reply_json("PUT", "user/1", 200, renamed);

    let update = UserUpdate {
        name: Some("Renamed".into()),
        ..Default::default()
    };
    let user = harness.app.session().update_user(&update).await.unwrap();

    assert_eq!(user.name, "Renamed");
    assert_eq!(
        harness.app.state().session.user().map(|user| user.name),
        Some("Renamed".to_string())
    );
    assert_eq!(
        harness.stub.requests()[0].body,
        Some(RequestBody::Json(json!({"name": "Renamed"})))
    );
}

#[tokio::test]
async fn test_update_user_failure_keeps_identity() {
    let harness = TestApp::signed_in(&[42]);
    harness
        .stub
        .reply_json("PUT", "user/1", 400, json!({"detail": "Current password is incorrect"}));

    let err = harness
        .app
        .session()
        .update_user(&UserUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Current password is incorrect");
    assert_eq!(
        harness.app.state().session.user().map(|user| user.name),
        Some("User 1".to_string())
    );
}

#[tokio::test]
async fn test_verify_signs_user_in() {
    let harness = TestApp::signed_out();
    harness
        .stub
        .reply_json("GET", "auth/verify/tok-1", 200, fixtures::user_json(4, &[]));

    let user = harness.app.session().verify("tok-1").await.unwrap();

    assert_eq!(user.id.get(), 4);
    assert!(harness.is_authenticated());
}

#[tokio::test]
async fn test_reset_password_posts_new_password() {
    let harness = TestApp::signed_out();
    harness
        .stub
        .reply_json("POST", "auth/reset-password/tok-2", 200, json!({"status": 200}));

    harness
        .app
        .session()
        .reset_password("tok-2", "n3w")
        .await
        .unwrap();

    assert_eq!(
        harness.stub.requests()[0].body,
        Some(RequestBody::Json(json!({"new_password": "n3w"})))
    );
}

#[tokio::test]
async fn test_logout_with_expired_cookie_sends_one_request() {
    let harness = TestApp::signed_in(&[42]);
    harness.stub.forget("GET", "auth/logout");
    harness
        .stub
        .reply_json("GET", "auth/logout", 401, json!({"detail": "Not authenticated"}));

    let visit = harness.app.logout().await.unwrap();

    assert_eq!(harness.stub.calls_to("GET", "auth/logout"), 1);
    assert!(!harness.is_authenticated());
    assert_eq!(visit.navigation.route().full_path, "/");
    assert!(!visit.navigation.is_redirect());
}

#[tokio::test]
async fn test_register_without_created_status_does_not_sign_in() {
    let harness = TestApp::signed_out();
    harness
        .stub
        .reply_json("POST", "auth/register", 200, json!({"status": "queued"}));

    let err = harness.app.session().register(&form()).await.unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert_eq!(harness.stub.calls_to("POST", "auth/login"), 0);
    assert!(!harness.is_authenticated());
}
