//! Per-transition access check.
//!
//! DESIGN
//! ======
//! Every attempt starts in `Evaluating`, asks the probe for a fresh answer,
//! and ends in exactly one terminal state. Nothing about the session is
//! remembered between attempts, so a revoked session is caught on the very
//! next navigation.
//!
//! Attempts are serialized behind an async lock: a second attempt does not
//! start its status check until the first one has settled.

use tokio::sync::Mutex;

use super::SessionProbe;
use super::routes::{Access, HOME_PATH, LOGIN_PATH, RouteMatch, RouteTable};

/// Outcome of the access rule for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectLogin,
    RedirectHome,
}

/// Pure access rule: what to do with a route given the session state.
#[must_use]
pub fn evaluate(access: Access, authenticated: bool) -> Decision {
    match (access, authenticated) {
        (Access::RequiresAuth, false) => Decision::RedirectLogin,
        (Access::RequiresGuest, true) => Decision::RedirectHome,
        _ => Decision::Allow,
    }
}

/// Guard states for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Evaluating,
    Allowed,
    RedirectedToLogin,
    RedirectedToHome,
}

impl NavState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Evaluating)
    }
}

impl From<Decision> for NavState {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Self::Allowed,
            Decision::RedirectLogin => Self::RedirectedToLogin,
            Decision::RedirectHome => Self::RedirectedToHome,
        }
    }
}

/// Result of one guarded navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub state: NavState,
    pub authenticated: bool,
    /// Route the requested location matched, if any.
    pub matched: Option<RouteMatch>,
}

impl Navigation {
    /// Where the router should end up after this attempt.
    #[must_use]
    pub fn destination(&self) -> &str {
        match self.state {
            NavState::RedirectedToLogin => LOGIN_PATH,
            NavState::RedirectedToHome => HOME_PATH,
            NavState::Evaluating | NavState::Allowed => &self.requested,
        }
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&'static str> {
        match self.state {
            NavState::RedirectedToLogin => Some(LOGIN_PATH),
            NavState::RedirectedToHome => Some(HOME_PATH),
            NavState::Evaluating | NavState::Allowed => None,
        }
    }
}

pub struct NavigationGuard<P> {
    probe: P,
    routes: RouteTable,
    attempt: Mutex<()>,
}

impl<P: SessionProbe> NavigationGuard<P> {
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self::with_routes(probe, RouteTable::default())
    }

    #[must_use]
    pub fn with_routes(probe: P, routes: RouteTable) -> Self {
        Self { probe, routes, attempt: Mutex::new(()) }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Run the guard for a transition to `location`.
    pub async fn navigate(&self, location: &str) -> Navigation {
        let _attempt = self.attempt.lock().await;

        let matched = self.routes.resolve(location);
        let access = matched.as_ref().map_or(Access::Public, |m| m.route.access);
        tracing::debug!(location, ?access, state = ?NavState::Evaluating, "navigation guard");

        let authenticated = self.probe.is_authenticated().await;
        let state = NavState::from(evaluate(access, authenticated));
        tracing::debug!(location, authenticated, ?state, "navigation settled");

        Navigation { requested: location.to_owned(), state, authenticated, matched }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
