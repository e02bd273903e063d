//! Route table and the session-gated navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `routes` is the static table of admin screens and their access rules,
//! `guard` runs the per-transition check against a [`SessionProbe`]
//! (normally [`crate::services::AuthService`]).

pub mod guard;
pub mod routes;

use async_trait::async_trait;

pub use guard::{Decision, NavState, Navigation, NavigationGuard, evaluate};
pub use routes::{Access, RouteDescriptor, RouteMatch, RouteTable, View};

/// Fresh answer to "is this session signed in?".
///
/// Must be total: failures are reported as `false`, never as errors.
#[async_trait]
pub trait SessionProbe: Send + Sync {
    async fn is_authenticated(&self) -> bool;
}
