use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use sotw_config::RouteConfig;
use thiserror::Error;
use tokio::sync::watch;

use crate::domains::session::SessionStore;
use crate::navigation::guards::{GuardContext, GuardDecision, GuardPipeline};
use crate::navigation::route::{RouteMatch, RouteTable};

/// Redirects followed before a navigation is abandoned.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches {0}")]
    NoRoute(String),

    #[error("navigation to {path} exceeded {hops} redirects")]
    RedirectLoop { path: String, hops: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Allowed(RouteMatch),
    Redirected { requested: String, route: RouteMatch },
}

impl NavigationOutcome {
    /// Where navigation ended up.
    pub fn route(&self) -> &RouteMatch {
        match self {
            NavigationOutcome::Allowed(route) | NavigationOutcome::Redirected { route, .. } => {
                route
            }
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, NavigationOutcome::Redirected { .. })
    }
}

#[derive(Debug)]
struct NavigatorInner {
    table: RouteTable,
    pipeline: GuardPipeline,
    session: SessionStore,
    home: String,
    location: watch::Sender<Option<RouteMatch>>,
    last_requested: Mutex<Option<String>>,
}

/// Resolves paths, runs the guard pipeline and publishes the location.
#[derive(Debug, Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

impl Navigator {
    pub fn new(
        table: RouteTable,
        pipeline: GuardPipeline,
        session: SessionStore,
        home: impl Into<String>,
    ) -> Self {
        let (location, _) = watch::channel(None);
        Self {
            inner: Arc::new(NavigatorInner {
                table,
                pipeline,
                session,
                home: home.into(),
                location,
                last_requested: Mutex::new(None),
            }),
        }
    }

    /// Standard routes and guards for the given route configuration.
    pub fn standard(routes: &RouteConfig, session: SessionStore) -> Self {
        Self::new(
            RouteTable::standard(routes),
            GuardPipeline::standard(routes),
            session,
            routes.home.clone(),
        )
    }

    /// Navigate to `path`, following guard redirects.
    pub fn navigate(&self, path: &str) -> Result<NavigationOutcome, NavigationError> {
        let requested = path.to_string();
        let mut current = requested.clone();

        for hops in 0..=MAX_REDIRECTS {
            let target = self
                .inner
                .table
                .resolve(&current)
                .ok_or_else(|| NavigationError::NoRoute(current.clone()))?;
            let session = self.inner.session.current();
            let decision = self.inner.pipeline.evaluate(&GuardContext {
                target: &target,
                session: &session,
            });

            match decision {
                GuardDecision::Allow => {
                    debug!("[Navigator] Entered {} ({})", target.full_path, target.name);
                    self.inner.location.send_replace(Some(target.clone()));
                    return Ok(if hops == 0 {
                        NavigationOutcome::Allowed(target)
                    } else {
                        NavigationOutcome::Redirected {
                            requested,
                            route: target,
                        }
                    });
                }
                GuardDecision::Redirect(redirect) => {
                    if redirect.remember_target {
                        *self.inner.last_requested.lock() = Some(target.full_path.clone());
                    }
                    info!("[Navigator] {} -> {}", target.full_path, redirect.to);
                    current = redirect.to;
                }
            }
        }

        Err(NavigationError::RedirectLoop {
            path: requested,
            hops: MAX_REDIRECTS,
        })
    }

    pub fn current(&self) -> Option<RouteMatch> {
        self.inner.location.borrow().clone()
    }

    pub fn current_path(&self) -> Option<String> {
        self.inner
            .location
            .borrow()
            .as_ref()
            .map(|route| route.full_path.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<RouteMatch>> {
        self.inner.location.subscribe()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.table
    }

    /// Path that was blocked by the auth guard, kept across the login
    /// redirect.
    pub fn last_requested_path(&self) -> Option<String> {
        self.inner.last_requested.lock().clone()
    }

    /// Consume the remembered path, falling back to home.
    pub fn take_post_login_destination(&self) -> String {
        self.inner
            .last_requested
            .lock()
            .take()
            .unwrap_or_else(|| self.inner.home.clone())
    }
}
