//! Route table, guard pipeline and navigator.

pub mod guards;
pub mod navigator;
pub mod route;

pub use guards::{
    GuardContext, GuardDecision, GuardPipeline, GuestOnly, MembershipGuard, NavigationGuard,
    Redirect, RequireAuth,
};
pub use navigator::{MAX_REDIRECTS, NavigationError, NavigationOutcome, Navigator};
pub use route::{Route, RouteMatch, RouteMeta, RouteTable};
