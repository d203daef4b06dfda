mod common;

use common::{TestApp, user};
use pretty_assertions::assert_eq;
use sotw_client::domains::{Session, SessionStore};
use sotw_client::infrastructure::testing::fixtures;
use sotw_client::navigation::route::names;
use sotw_client::navigation::{GuardContext, GuardDecision, GuardPipeline, Navigator, RouteTable};
use sotw_client::{CascadeReport, NavigationOutcome};
use sotw_config::RouteConfig;
use sotw_model::{LoginCredentials, SotwId};

const PROTECTED: &[&str] = &[
    "/about",
    "/profile",
    "/sotw/42",
    "/sotw/42/results/3",
    "/invite/abc123",
    "/sotw/42?tab=history",
];

const GUEST: &[&str] = &["/login", "/register", "/verify/tok", "/reset-password/tok"];

#[test]
fn test_auth_guard_redirects_every_protected_route_to_login() {
    for path in PROTECTED {
        let navigator = Navigator::standard(&RouteConfig::default(), SessionStore::new());

        let outcome = navigator.navigate(path).unwrap();

        assert!(outcome.is_redirect(), "{path} should redirect");
        assert_eq!(outcome.route().name, names::LOGIN, "{path}");
        assert_eq!(navigator.last_requested_path().as_deref(), Some(*path));
        assert_eq!(navigator.current_path().as_deref(), Some("/login"));
    }
}

#[test]
fn test_guest_guard_redirects_every_guest_route_home() {
    for path in GUEST {
        let session = SessionStore::authenticated(user(1, &[]));
        let navigator = Navigator::standard(&RouteConfig::default(), session);

        let outcome = navigator.navigate(path).unwrap();

        assert_eq!(outcome.route().name, names::HOME, "{path}");
        assert_eq!(navigator.last_requested_path(), None);
    }
}

#[test]
fn test_guard_pipeline_is_pure_over_session_snapshot() {
    let routes = RouteConfig::default();
    let table = RouteTable::standard(&routes);
    let pipeline = GuardPipeline::standard(&routes);
    let target = table.resolve("/sotw/42").unwrap();

    let signed_out = Session::default();
    let member = Session {
        user: Some(user(1, &[42])),
    };

    for _ in 0..3 {
        assert!(matches!(
            pipeline.evaluate(&GuardContext {
                target: &target,
                session: &signed_out
            }),
            GuardDecision::Redirect(_)
        ));
        assert_eq!(
            pipeline.evaluate(&GuardContext {
                target: &target,
                session: &member
            }),
            GuardDecision::Allow
        );
    }
}

#[tokio::test]
async fn test_unauthenticated_group_visit_redirects_to_login_without_fetching() {
    let harness = TestApp::signed_out();

    let visit = harness.app.visit("/sotw/42").await.unwrap();

    assert_eq!(
        visit.navigation,
        NavigationOutcome::Redirected {
            requested: "/sotw/42".into(),
            route: harness
                .app
                .navigator()
                .routes()
                .resolve("/login")
                .unwrap(),
        }
    );
    assert_eq!(visit.cascade, None);
    assert_eq!(
        harness.app.navigator().last_requested_path().as_deref(),
        Some("/sotw/42")
    );
    assert!(harness.stub.requests().is_empty());
}

#[tokio::test]
async fn test_login_continues_to_interrupted_group() {
    let harness = TestApp::signed_out();
    harness
        .stub
        .reply_json("POST", "auth/login", 200, fixtures::user_json(1, &[42]));
    harness
        .stub
        .reply_json("GET", "sotw/42", 200, fixtures::sotw_json(42, "Office"));
    harness
        .stub
        .reply_json("GET", "sotw/42/current_week", 200, fixtures::week_json(42, 3));

    harness.app.visit("/sotw/42").await.unwrap();
    let visit = harness
        .app
        .login(&LoginCredentials::new("user1@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(visit.navigation.route().full_path, "/sotw/42");
    assert!(matches!(
        visit.cascade,
        Some(CascadeReport::Loaded { id: SotwId(42), .. })
    ));
    assert_eq!(harness.location().as_deref(), Some("/sotw/42"));
    assert_eq!(harness.app.navigator().last_requested_path(), None);
}

#[tokio::test]
async fn test_non_member_is_sent_home_without_fetching() {
    let harness = TestApp::signed_in(&[7]);

    let visit = harness.app.visit("/sotw/42/results/1").await.unwrap();

    assert_eq!(visit.navigation.route().name, names::HOME);
    assert_eq!(visit.cascade, None);
    assert!(harness.stub.requests().is_empty());
}

#[tokio::test]
async fn test_authenticated_user_on_login_goes_home() {
    let harness = TestApp::signed_in(&[]);

    let visit = harness.app.visit("/login").await.unwrap();

    assert!(visit.navigation.is_redirect());
    assert_eq!(harness.location().as_deref(), Some("/"));
}
