use serde::Serialize;

use super::resolver::ResolvedRoute;
use super::routes::{DASHBOARD, LOGIN, RouteTable};

/// Query parameter carrying the originally requested location through the login page.
pub const REDIRECT_PARAM: &str = "redirect";

/// AuthState
///
/// Read-only view of the authentication store. The guard never writes to it.
pub trait AuthState {
    fn is_logged_in(&self) -> bool;
}

impl AuthState for bool {
    fn is_logged_in(&self) -> bool {
        *self
    }
}

/// A named navigation target with its query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub name: &'static str,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            query: Vec::new(),
        }
    }

    pub fn href(&self, table: &RouteTable) -> String {
        table.href(self.name, &self.query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(Location),
}

/// A route requires authentication unless some matched record explicitly opts out.
pub fn requires_auth(route: &ResolvedRoute) -> bool {
    !route
        .matched
        .iter()
        .any(|record| record.meta.requires_auth == Some(false))
}

/// decide
///
/// Runs before every navigation, the initial one included:
/// - protected target while logged out: go to the login page, remembering the target;
/// - login page while logged in: go to the landing page;
/// - anything else proceeds unchanged.
pub fn decide(route: &ResolvedRoute, auth: &dyn AuthState) -> NavigationDecision {
    let logged_in = auth.is_logged_in();

    if requires_auth(route) && !logged_in {
        return NavigationDecision::Redirect(Location {
            name: LOGIN,
            query: vec![(REDIRECT_PARAM.to_string(), route.full_path.clone())],
        });
    }

    if route.name == Some(LOGIN) && logged_in {
        return NavigationDecision::Redirect(Location::named(DASHBOARD));
    }

    NavigationDecision::Allow
}
