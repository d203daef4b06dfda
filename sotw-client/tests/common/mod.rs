//! Shared harness for the client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use sotw_client::app::AppState;
use sotw_client::domains::SessionStore;
use sotw_client::infrastructure::testing::{CallEvent, StubTransport, fixtures};
use sotw_client::App;
use sotw_config::ClientConfig;
use sotw_model::User;

/// App wired to a scripted transport.
pub struct TestApp {
    pub app: App,
    pub stub: StubTransport,
}

impl TestApp {
    pub fn signed_out() -> Self {
        Self::with_state(AppState::new())
    }

    /// Signed in as user 1, member of `member_of`.
    pub fn signed_in(member_of: &[i64]) -> Self {
        Self::with_state(AppState::with_session(SessionStore::authenticated(user(
            1, member_of,
        ))))
    }

    fn with_state(state: AppState) -> Self {
        let stub = StubTransport::new();
        // Logout always succeeds unless a test scripts otherwise.
        stub.reply_json("GET", "auth/logout", 200, serde_json::json!({"status": 200}));
        let app = App::with_state(ClientConfig::default(), Arc::new(stub.clone()), state);
        Self { app, stub }
    }

    pub fn location(&self) -> Option<String> {
        self.app.navigator().current_path()
    }

    pub fn is_authenticated(&self) -> bool {
        self.app.state().session.is_authenticated()
    }

    /// Paths of started requests, in order.
    pub fn started(&self) -> Vec<String> {
        self.stub
            .events()
            .into_iter()
            .filter_map(|event| match event {
                CallEvent::Started { path, .. } => Some(path),
                CallEvent::Finished { .. } => None,
            })
            .collect()
    }
}

pub fn user(id: i64, member_of: &[i64]) -> User {
    serde_json::from_value(fixtures::user_json(id, member_of)).expect("fixture user")
}
