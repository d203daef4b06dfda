use std::collections::BTreeMap;

use serde::Serialize;
use sotw_config::RouteConfig;

/// Route names
pub mod names {
    pub const HOME: &str = "home";
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const VERIFY: &str = "verify";
    pub const RESET_PASSWORD: &str = "reset-password";
    pub const ABOUT: &str = "about";
    pub const PROFILE: &str = "profile";
    pub const SOTW: &str = "sotw";
    pub const RESULTS: &str = "results";
    pub const INVITE: &str = "invite";
    pub const FORBIDDEN: &str = "403";
    pub const NOT_FOUND: &str = "404";
}

/// Route parameter names
pub mod params {
    pub const SOTW_ID: &str = "sotwId";
    pub const WEEK_NUM: &str = "weekNum";
    pub const SHARE_TOKEN: &str = "shareToken";
    pub const TOKEN: &str = "token";
}

/// Access metadata attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest: bool,
    /// Parameter holding a group id the user must be a member of.
    pub member_of: Option<&'static str>,
}

impl RouteMeta {
    pub const OPEN: RouteMeta = RouteMeta {
        requires_auth: false,
        guest: false,
        member_of: None,
    };

    pub const AUTH: RouteMeta = RouteMeta {
        requires_auth: true,
        guest: false,
        member_of: None,
    };

    pub const GUEST: RouteMeta = RouteMeta {
        requires_auth: false,
        guest: true,
        member_of: None,
    };

    pub const fn member_of(param: &'static str) -> RouteMeta {
        RouteMeta {
            requires_auth: true,
            guest: false,
            member_of: Some(param),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    CatchAll,
}

#[derive(Debug, Clone)]
pub struct Route {
    name: &'static str,
    pattern: String,
    segments: Vec<Segment>,
    meta: RouteMeta,
}

impl Route {
    /// `pattern` uses `:name` for parameters and `*` for a trailing
    /// catch-all segment.
    pub fn new(name: &'static str, pattern: &str, meta: RouteMeta) -> Self {
        let segments = split_path(pattern)
            .map(|segment| {
                if segment == "*" {
                    Segment::CatchAll
                } else if let Some(param) = segment.strip_prefix(':') {
                    Segment::Param(param.to_string())
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();
        Self {
            name,
            pattern: pattern.to_string(),
            segments,
            meta,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn meta(&self) -> RouteMeta {
        self.meta
    }

    fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut parts = split_path(path);
        for segment in &self.segments {
            match segment {
                Segment::CatchAll => return Some(params),
                Segment::Literal(literal) => {
                    if parts.next()? != literal.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), parts.next()?.to_string());
                }
            }
        }
        parts.next().is_none().then_some(params)
    }
}

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub name: &'static str,
    /// Path as requested, query string included.
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub meta: RouteMeta,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Ordered route table; the first matching route wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// The application's routes, using the configured well-known paths.
    pub fn standard(config: &RouteConfig) -> Self {
        Self::new()
            .with_route(Route::new(names::HOME, &config.home, RouteMeta::OPEN))
            .with_route(Route::new(names::LOGIN, &config.login, RouteMeta::GUEST))
            .with_route(Route::new(names::REGISTER, "/register", RouteMeta::GUEST))
            .with_route(Route::new(names::VERIFY, "/verify/:token", RouteMeta::GUEST))
            .with_route(Route::new(
                names::RESET_PASSWORD,
                "/reset-password/:token",
                RouteMeta::GUEST,
            ))
            .with_route(Route::new(names::ABOUT, "/about", RouteMeta::AUTH))
            .with_route(Route::new(names::PROFILE, "/profile", RouteMeta::AUTH))
            .with_route(Route::new(
                names::SOTW,
                "/sotw/:sotwId",
                RouteMeta::member_of(params::SOTW_ID),
            ))
            .with_route(Route::new(
                names::RESULTS,
                "/sotw/:sotwId/results/:weekNum",
                RouteMeta::member_of(params::SOTW_ID),
            ))
            .with_route(Route::new(names::INVITE, "/invite/:shareToken", RouteMeta::AUTH))
            .with_route(Route::new(names::FORBIDDEN, &config.forbidden, RouteMeta::OPEN))
            .with_route(Route::new(names::NOT_FOUND, &config.not_found, RouteMeta::OPEN))
            .with_route(Route::new(names::NOT_FOUND, "/*", RouteMeta::OPEN))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn resolve(&self, full_path: &str) -> Option<RouteMatch> {
        let path = strip_query(full_path);
        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch {
                name: route.name,
                full_path: full_path.to_string(),
                params,
                meta: route.meta,
            })
        })
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> RouteTable {
        RouteTable::standard(&RouteConfig::default())
    }

    #[test]
    fn test_resolves_params_and_keeps_full_path() {
        let route = table().resolve("/sotw/42/results/3?tab=songs").unwrap();
        assert_eq!(route.name, names::RESULTS);
        assert_eq!(route.full_path, "/sotw/42/results/3?tab=songs");
        assert_eq!(route.param(params::SOTW_ID), Some("42"));
        assert_eq!(route.param(params::WEEK_NUM), Some("3"));
        assert_eq!(route.meta, RouteMeta::member_of(params::SOTW_ID));
    }

    #[test]
    fn test_trailing_slash_and_root() {
        assert_eq!(table().resolve("/sotw/42/").unwrap().name, names::SOTW);
        assert_eq!(table().resolve("/").unwrap().name, names::HOME);
        assert_eq!(table().resolve("").unwrap().name, names::HOME);
    }

    #[test]
    fn test_unknown_paths_hit_catch_all() {
        let route = table().resolve("/nowhere/at/all").unwrap();
        assert_eq!(route.name, names::NOT_FOUND);
        assert_eq!(route.meta, RouteMeta::OPEN);
        assert_eq!(table().resolve("/sotw").unwrap().name, names::NOT_FOUND);
    }

    #[test]
    fn test_table_without_catch_all() {
        let table = RouteTable::new().with_route(Route::new("only", "/only", RouteMeta::OPEN));
        assert!(table.resolve("/other").is_none());
    }
}
