//! Session state and authentication actions.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sotw_model::{
    LoginCredentials, PasswordReset, PasswordResetRequest, RegisterForm, SotwId,
    SpotifyAuthPayload, User, UserUpdate,
};
use tokio::sync::watch;

use crate::domains::errors::{ActionError, ActionResult};
use crate::domains::store::Slot;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::constants::endpoints;
use crate::infrastructure::transport::RequestConfig;

/// The client's belief about who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_member_of(&self, sotw_id: SotwId) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.is_member_of(sotw_id))
    }
}

/// Observable session slot. Mutations are crate-private; use
/// [`SessionManager`] to change it.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    slot: Slot<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an already-authenticated user.
    pub fn authenticated(user: User) -> Self {
        Self {
            slot: Slot::new(Session { user: Some(user) }),
        }
    }

    pub fn current(&self) -> Session {
        self.slot.current()
    }

    pub fn user(&self) -> Option<User> {
        self.slot.with(|session| session.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot.with(Session::is_authenticated)
    }

    pub fn is_member_of(&self, sotw_id: SotwId) -> bool {
        self.slot.with(|session| session.is_member_of(sotw_id))
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.slot.subscribe()
    }

    pub(crate) fn set_user(&self, user: User) {
        self.slot.replace(Session { user: Some(user) });
    }

    pub(crate) fn clear(&self) {
        self.slot.modify(|session| session.user = None);
    }
}

#[derive(Debug, Deserialize)]
struct SpotifyClientId {
    client_id: String,
}

/// The access-token endpoint answers with the updated user, or with a bare
/// `{"status": 202}` when nothing changed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpotifyLinkReply {
    User(Box<User>),
    Ack {
        #[allow(dead_code)]
        status: u16,
    },
}

/// Authentication actions over the session store.
#[derive(Debug, Clone)]
pub struct SessionManager {
    api: ApiClient,
    store: SessionStore,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Register, then sign in with the same credentials. Only a 201 counts
    /// as a completed registration.
    pub async fn register(&self, form: &RegisterForm) -> ActionResult<User> {
        let response = self
            .api
            .post::<_, Value>(endpoints::auth::REGISTER, form)
            .await?;
        if response.status != 201 {
            warn!(
                "[Session] Registration of {} answered {}; not signing in",
                form.email, response.status
            );
            return Err(ActionError::Failed {
                message: format!("registration returned status {}", response.status),
                cause: Some(response.status),
            });
        }
        debug!("[Session] Registered {}", form.email);
        self.login(&form.credentials()).await
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> ActionResult<User> {
        let response = self
            .api
            .post_form::<User>(endpoints::auth::LOGIN, credentials.form_fields())
            .await?;
        info!("[Session] Signed in as {}", response.data.email);
        self.store.set_user(response.data.clone());
        Ok(response.data)
    }

    /// Ends the session. The server call is best effort; local state is
    /// always cleared and this never fails. The request bypasses the
    /// response policy so an expired cookie does not trigger a second
    /// logout and redirect.
    pub async fn logout(&self) {
        let request = RequestConfig::get(endpoints::auth::LOGOUT).mark_retried();
        if let Err(err) = self.api.dispatch(request).await {
            debug!("[Session] Logout request failed: {}", err);
        }
        if self.store.is_authenticated() {
            info!("[Session] Signed out");
        }
        self.store.clear();
    }

    /// Refresh the user from the server. Failure leaves the session as it
    /// was; only the 401 policy invalidates a session.
    pub async fn get_current_user(&self) -> Option<User> {
        match self.api.get::<User>(endpoints::auth::CURRENT_USER).await {
            Ok(response) => {
                self.store.set_user(response.data.clone());
                Some(response.data)
            }
            Err(err) => {
                warn!("[Session] Could not load current user: {}", err);
                None
            }
        }
    }

    pub async fn update_user(&self, update: &UserUpdate) -> ActionResult<User> {
        let user = self.store.user().ok_or(ActionError::Unauthenticated)?;
        let response = self
            .api
            .put::<_, User>(&endpoints::user::by_id(user.id), update)
            .await?;
        self.store.set_user(response.data.clone());
        Ok(response.data)
    }

    /// Confirm an e-mail verification token; the server signs the user in.
    pub async fn verify(&self, token: &str) -> ActionResult<User> {
        let response = self
            .api
            .get::<User>(&endpoints::auth::verify(token))
            .await?;
        info!("[Session] Verified {}", response.data.email);
        self.store.set_user(response.data.clone());
        Ok(response.data)
    }

    pub async fn request_password_reset(&self, email: &str) -> ActionResult<()> {
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        self.api
            .post::<_, Value>(endpoints::auth::RESET_PASSWORD, &body)
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> ActionResult<()> {
        let body = PasswordReset {
            new_password: new_password.to_string(),
        };
        self.api
            .post::<_, Value>(&endpoints::auth::reset_password(token), &body)
            .await?;
        Ok(())
    }

    pub async fn spotify_client_id(&self) -> ActionResult<String> {
        let response = self
            .api
            .get::<SpotifyClientId>(endpoints::auth::SPOTIFY_CLIENT_ID)
            .await?;
        Ok(response.data.client_id)
    }

    /// Forward a Spotify authorization callback. Returns the updated user
    /// when the server sent one.
    pub async fn link_spotify(&self, payload: &SpotifyAuthPayload) -> ActionResult<Option<User>> {
        let response = self
            .api
            .put::<_, SpotifyLinkReply>(endpoints::auth::SPOTIFY_ACCESS_TOKEN, payload)
            .await?;
        match response.data {
            SpotifyLinkReply::User(user) => {
                self.store.set_user((*user).clone());
                Ok(Some(*user))
            }
            SpotifyLinkReply::Ack { .. } => Ok(None),
        }
    }
}
