//! Application container.
//!
//! [`App`] owns the stores, wires the managers to one [`ApiClient`] with the
//! [`SessionPolicy`] installed, and ties navigation to the fetch cascade.

pub mod policy;
pub mod state;

use std::sync::Arc;

use log::debug;
use serde::Serialize;
use sotw_config::ClientConfig;
use sotw_model::{LoginCredentials, RegisterForm, SotwId, User};
use thiserror::Error;

use crate::cascade::{CascadeReport, FetchCascade};
use crate::domains::errors::ActionError;
use crate::domains::group::GroupManager;
use crate::domains::period::PeriodManager;
use crate::domains::results::ResultsManager;
use crate::domains::session::SessionManager;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::transport::{ReqwestTransport, Transport, TransportError};
use crate::navigation::navigator::{NavigationError, NavigationOutcome, Navigator};
use crate::navigation::route::{RouteMatch, names, params};

pub use policy::SessionPolicy;
pub use state::{AppState, StateSnapshot};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

/// Result of entering a path: where navigation landed and, for group
/// routes, what the cascade loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub navigation: NavigationOutcome,
    pub cascade: Option<CascadeReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub location: Option<String>,
    pub last_requested_path: Option<String>,
    #[serde(flatten)]
    pub state: StateSnapshot,
}

#[derive(Debug, Clone)]
pub struct App {
    config: ClientConfig,
    state: AppState,
    api: ApiClient,
    navigator: Navigator,
    session: SessionManager,
    groups: GroupManager,
    periods: PeriodManager,
    results: ResultsManager,
    cascade: FetchCascade,
}

impl App {
    /// App talking to the configured API over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::with_state(config, transport, AppState::new())
    }

    pub fn with_state(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        state: AppState,
    ) -> Self {
        let api = ApiClient::new(transport);
        let navigator = Navigator::standard(&config.routes, state.session.clone());
        api.set_interceptor(Arc::new(SessionPolicy::new(
            state.session.clone(),
            navigator.clone(),
            config.routes.clone(),
        )));

        let session = SessionManager::new(api.clone(), state.session.clone());
        let groups = GroupManager::new(api.clone(), state.group.clone(), session.clone());
        let periods = PeriodManager::new(api.clone(), state.period.clone());
        let results = ResultsManager::new(api.clone(), state.results.clone());
        let cascade = FetchCascade::new(groups.clone(), periods.clone(), results.clone());

        Self {
            config,
            state,
            api,
            navigator,
            session,
            groups,
            periods,
            results,
            cascade,
        }
    }

    /// Restore the session from the server's cookie, if it still holds one.
    pub async fn start(&self) -> Option<User> {
        self.session.get_current_user().await
    }

    /// Navigate to `path` and run the cascade for group routes.
    pub async fn visit(&self, path: &str) -> Result<Visit, NavigationError> {
        let navigation = self.navigator.navigate(path)?;
        let cascade = self.run_cascade(navigation.route()).await;
        Ok(Visit {
            navigation,
            cascade,
        })
    }

    async fn run_cascade(&self, route: &RouteMatch) -> Option<CascadeReport> {
        let id = route
            .param(params::SOTW_ID)
            .and_then(|raw| raw.parse::<SotwId>().ok());

        match route.name {
            names::SOTW => Some(self.cascade.enter_group(id?).await),
            names::RESULTS => {
                let week_num = route.param(params::WEEK_NUM)?.parse::<u32>().ok()?;
                Some(self.cascade.enter_results(id?, week_num).await)
            }
            _ => None,
        }
    }

    /// Sign in, then continue to the path the auth guard interrupted.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Visit, AppError> {
        self.session.login(credentials).await?;
        let destination = self.navigator.take_post_login_destination();
        debug!("[Session] Continuing to {}", destination);
        Ok(self.visit(&destination).await?)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<Visit, AppError> {
        self.session.register(form).await?;
        let destination = self.navigator.take_post_login_destination();
        Ok(self.visit(&destination).await?)
    }

    pub async fn logout(&self) -> Result<Visit, NavigationError> {
        self.session.logout().await;
        self.visit(&self.config.routes.home).await
    }

    /// Accept an invite and open the joined group.
    pub async fn join_invite(&self, share_token: &str) -> Result<Visit, AppError> {
        let sotw = self.groups.join_invite(share_token).await?;
        Ok(self.visit(&format!("/sotw/{}", sotw.id)).await?)
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            location: self.navigator.current_path(),
            last_requested_path: self.navigator.last_requested_path(),
            state: self.state.snapshot(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn groups(&self) -> &GroupManager {
        &self.groups
    }

    pub fn periods(&self) -> &PeriodManager {
        &self.periods
    }

    pub fn results(&self) -> &ResultsManager {
        &self.results
    }

    pub fn cascade(&self) -> &FetchCascade {
        &self.cascade
    }
}
