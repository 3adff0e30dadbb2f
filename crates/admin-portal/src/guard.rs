//! Route table and navigation guard

use krishi_common::Officer;
use std::fmt;

/// Views reachable in the portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    FarmVerification,
    ClaimsDashboard,
    ClaimDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::FarmVerification => "/".to_string(),
            Route::ClaimsDashboard => "/claims".to_string(),
            Route::ClaimDetail(id) => format!("/claim/{}", id),
        }
    }

    /// Match a path against the route table
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Some(Route::FarmVerification),
            "/login" => Some(Route::Login),
            "/claims" => Some(Route::ClaimsDashboard),
            other => other
                .strip_prefix("/claim/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Route::ClaimDetail(id.to_string())),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of entering a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may render for the current session
///
/// Depends only on whether an officer is signed in.
pub fn authorize(session: Option<&Officer>, route: &Route) -> Access {
    if route.is_protected() && session.is_none() {
        Access::Redirect(Route::Login)
    } else {
        Access::Allow
    }
}

/// Route that ends up rendering when `path` is requested
///
/// Signed out, everything except the login page lands on the login page.
/// Signed in, the login page and unknown paths land on farm verification.
pub fn resolve(session: Option<&Officer>, path: &str) -> Route {
    let requested = Route::parse(path);

    if session.is_none() {
        return Route::Login;
    }

    match requested {
        Some(Route::Login) | None => Route::FarmVerification,
        Some(route) => match authorize(session, &route) {
            Access::Allow => route,
            Access::Redirect(to) => to,
        },
    }
}
