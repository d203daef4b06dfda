//! Navigation guards.
//!
//! Guards are synchronous predicates over the resolved target and a
//! snapshot of the session. They never touch the network; membership is
//! checked against the already-loaded user.

use log::debug;
use serde::Serialize;
use sotw_config::RouteConfig;
use sotw_model::SotwId;

use crate::domains::session::Session;
use crate::navigation::route::RouteMatch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    /// Record the blocked target as the last requested path.
    pub remember_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn redirect(to: impl Into<String>) -> Self {
        GuardDecision::Redirect(Redirect {
            to: to.into(),
            remember_target: false,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    pub target: &'a RouteMatch,
    pub session: &'a Session,
}

pub trait NavigationGuard: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn check(&self, context: &GuardContext<'_>) -> GuardDecision;
}

/// Routes marked `requires_auth` send unauthenticated users to login.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    login: String,
}

impl RequireAuth {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

impl NavigationGuard for RequireAuth {
    fn name(&self) -> &'static str {
        "require-auth"
    }

    fn check(&self, context: &GuardContext<'_>) -> GuardDecision {
        if context.target.meta.requires_auth && !context.session.is_authenticated() {
            GuardDecision::Redirect(Redirect {
                to: self.login.clone(),
                remember_target: true,
            })
        } else {
            GuardDecision::Allow
        }
    }
}

/// Routes marked `guest` send authenticated users home.
#[derive(Debug, Clone)]
pub struct GuestOnly {
    home: String,
}

impl GuestOnly {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }
}

impl NavigationGuard for GuestOnly {
    fn name(&self) -> &'static str {
        "guest-only"
    }

    fn check(&self, context: &GuardContext<'_>) -> GuardDecision {
        if context.target.meta.guest && context.session.is_authenticated() {
            GuardDecision::redirect(self.home.clone())
        } else {
            GuardDecision::Allow
        }
    }
}

/// Group routes require the group id to be in the user's membership list.
#[derive(Debug, Clone)]
pub struct MembershipGuard {
    home: String,
}

impl MembershipGuard {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }
}

impl NavigationGuard for MembershipGuard {
    fn name(&self) -> &'static str {
        "membership"
    }

    fn check(&self, context: &GuardContext<'_>) -> GuardDecision {
        let Some(param) = context.target.meta.member_of else {
            return GuardDecision::Allow;
        };
        let is_member = context
            .target
            .param(param)
            .and_then(|raw| raw.parse::<SotwId>().ok())
            .is_some_and(|id| context.session.is_member_of(id));
        if is_member {
            GuardDecision::Allow
        } else {
            GuardDecision::redirect(self.home.clone())
        }
    }
}

/// Ordered guards; the first non-allow decision wins.
#[derive(Debug, Default)]
pub struct GuardPipeline {
    guards: Vec<Box<dyn NavigationGuard>>,
}

impl GuardPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auth, then guest, then membership.
    pub fn standard(routes: &RouteConfig) -> Self {
        Self::new()
            .with_guard(RequireAuth::new(routes.login.clone()))
            .with_guard(GuestOnly::new(routes.home.clone()))
            .with_guard(MembershipGuard::new(routes.home.clone()))
    }

    pub fn with_guard(mut self, guard: impl NavigationGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn evaluate(&self, context: &GuardContext<'_>) -> GuardDecision {
        for guard in &self.guards {
            let decision = guard.check(context);
            if let GuardDecision::Redirect(redirect) = &decision {
                debug!(
                    "[Navigator] {} redirected {} to {}",
                    guard.name(),
                    context.target.full_path,
                    redirect.to
                );
                return decision;
            }
        }
        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::route::RouteTable;
    use serde_json::json;
    use sotw_model::User;

    fn member_of(ids: &[i64]) -> Session {
        let list: Vec<_> = ids.iter().map(|id| json!({"id": id})).collect();
        let user: User = serde_json::from_value(json!({
            "id": 1, "email": "a@example.com", "name": "A", "sotw_list": list
        }))
        .unwrap();
        Session { user: Some(user) }
    }

    fn decide(path: &str, session: &Session) -> GuardDecision {
        let routes = RouteConfig::default();
        let target = RouteTable::standard(&routes).resolve(path).unwrap();
        GuardPipeline::standard(&routes).evaluate(&GuardContext {
            target: &target,
            session,
        })
    }

    #[test]
    fn test_auth_redirect_remembers_target() {
        assert_eq!(
            decide("/about", &Session::default()),
            GuardDecision::Redirect(Redirect {
                to: "/login".into(),
                remember_target: true
            })
        );
    }

    #[test]
    fn test_guest_redirect_goes_home() {
        assert_eq!(decide("/register", &member_of(&[])), GuardDecision::redirect("/"));
        assert_eq!(decide("/register", &Session::default()), GuardDecision::Allow);
    }

    #[test]
    fn test_membership() {
        assert_eq!(decide("/sotw/42", &member_of(&[42])), GuardDecision::Allow);
        assert_eq!(decide("/sotw/7", &member_of(&[42])), GuardDecision::redirect("/"));
        assert_eq!(decide("/sotw/abc", &member_of(&[42])), GuardDecision::redirect("/"));
    }

    #[test]
    fn test_auth_checked_before_membership() {
        let GuardDecision::Redirect(redirect) = decide("/sotw/42", &Session::default()) else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.to, "/login");
    }
}
