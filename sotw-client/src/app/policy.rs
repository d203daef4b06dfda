use async_trait::async_trait;
use log::{debug, info, warn};
use sotw_config::RouteConfig;

use crate::domains::session::SessionStore;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_error::ApiError;
use crate::infrastructure::constants::endpoints;
use crate::infrastructure::interceptor::ResponseInterceptor;
use crate::infrastructure::transport::RequestConfig;
use crate::navigation::navigator::Navigator;

/// Global response policy.
///
/// * 401 on a request not yet retried: mark it retried, force a logout and
///   redirect to login. A 401 on an already-retried request passes through.
/// * 404: redirect to the not-found view, except password reset.
/// * 403: redirect to the forbidden view, except pending-invite lookups.
/// * Anything else is returned unchanged.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    session: SessionStore,
    navigator: Navigator,
    routes: RouteConfig,
}

impl SessionPolicy {
    pub fn new(session: SessionStore, navigator: Navigator, routes: RouteConfig) -> Self {
        Self {
            session,
            navigator,
            routes,
        }
    }

    fn redirect(&self, to: &str) -> String {
        match self.navigator.navigate(to) {
            Ok(outcome) => outcome.route().full_path.clone(),
            Err(err) => {
                warn!("[ApiClient] Redirect to {} failed: {}", to, err);
                to.to_string()
            }
        }
    }

    async fn force_logout(&self, client: &ApiClient) {
        // Unintercepted, so a 401 here cannot re-enter the policy.
        let logout = RequestConfig::get(endpoints::auth::LOGOUT).mark_retried();
        if let Err(err) = client.dispatch(logout).await {
            debug!("[ApiClient] Logout during 401 handling failed: {}", err);
        }
        self.session.clear();
    }
}

#[async_trait]
impl ResponseInterceptor for SessionPolicy {
    async fn on_error(&self, client: &ApiClient, error: ApiError) -> ApiError {
        let (status, detail, request) = match error {
            ApiError::Status {
                status,
                detail,
                request,
            } => (status, detail, request),
            other => return other,
        };

        let unauthorized = status == 401 && !request.retried;
        let redirect_to = match status {
            401 if unauthorized => {
                info!(
                    "[ApiClient] 401 from {} {}; signing out",
                    request.method, request.path
                );
                self.force_logout(client).await;
                Some(&self.routes.login)
            }
            404 if !request.path.starts_with(endpoints::auth::RESET_PASSWORD) => {
                Some(&self.routes.not_found)
            }
            403 if !request
                .path
                .starts_with(endpoints::sotw::PENDING_INVITE_PREFIX) =>
            {
                Some(&self.routes.forbidden)
            }
            _ => None,
        };

        match redirect_to {
            Some(to) => {
                let redirect = self.redirect(to);
                info!(
                    "[ApiClient] {} from {} {}; redirected to {}",
                    status, request.method, request.path, redirect
                );
                let request = if unauthorized {
                    request.mark_retried()
                } else {
                    request
                };
                ApiError::Intercepted {
                    status,
                    redirect,
                    request,
                }
            }
            None => ApiError::Status {
                status,
                detail,
                request,
            },
        }
    }
}
