use super::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::navigation::routes::ROUTES;

/// Probe with a switchable answer that counts how often it was asked.
#[derive(Default)]
struct FakeProbe {
    authenticated: AtomicBool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeProbe {
    fn signed_in(authenticated: bool) -> Self {
        let probe = Self::default();
        probe.authenticated.store(authenticated, Ordering::SeqCst);
        probe
    }
}

#[async_trait]
impl SessionProbe for FakeProbe {
    async fn is_authenticated(&self) -> bool {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.authenticated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProbe for Arc<FakeProbe> {
    async fn is_authenticated(&self) -> bool {
        self.as_ref().is_authenticated().await
    }
}

// =============================================================
// evaluate
// =============================================================

#[test]
fn evaluate_truth_table() {
    assert_eq!(evaluate(Access::RequiresAuth, false), Decision::RedirectLogin);
    assert_eq!(evaluate(Access::RequiresAuth, true), Decision::Allow);
    assert_eq!(evaluate(Access::RequiresGuest, true), Decision::RedirectHome);
    assert_eq!(evaluate(Access::RequiresGuest, false), Decision::Allow);
    assert_eq!(evaluate(Access::Public, true), Decision::Allow);
    assert_eq!(evaluate(Access::Public, false), Decision::Allow);
}

#[test]
fn only_evaluating_is_non_terminal() {
    assert!(!NavState::Evaluating.is_terminal());
    for decision in [Decision::Allow, Decision::RedirectLogin, Decision::RedirectHome] {
        assert!(NavState::from(decision).is_terminal());
    }
}

// =============================================================
// navigate
// =============================================================

#[tokio::test]
async fn protected_routes_redirect_to_login_when_signed_out() {
    let guard = NavigationGuard::new(FakeProbe::signed_in(false));
    for route in ROUTES.iter().filter(|r| r.access == Access::RequiresAuth) {
        let location = route.path.replace(":id", "1");
        let nav = guard.navigate(&location).await;
        assert_eq!(nav.state, NavState::RedirectedToLogin, "{location}");
        assert_eq!(nav.destination(), "/login");
        assert_eq!(nav.redirect(), Some("/login"));
    }
}

#[tokio::test]
async fn mixed_case_protected_path_still_redirects() {
    let guard = NavigationGuard::new(FakeProbe::signed_in(false));
    let nav = guard.navigate("/MENUS").await;
    assert_eq!(nav.state, NavState::RedirectedToLogin);
    assert_eq!(nav.destination(), "/login");
}

#[tokio::test]
async fn login_redirects_home_when_signed_in() {
    let guard = NavigationGuard::new(FakeProbe::signed_in(true));
    let nav = guard.navigate("/login").await;
    assert_eq!(nav.state, NavState::RedirectedToHome);
    assert_eq!(nav.destination(), "/");
    assert!(nav.authenticated);
}

#[tokio::test]
async fn other_combinations_proceed() {
    let signed_out = NavigationGuard::new(FakeProbe::signed_in(false));
    let nav = signed_out.navigate("/login").await;
    assert_eq!(nav.state, NavState::Allowed);
    assert_eq!(nav.redirect(), None);
    assert_eq!(signed_out.navigate("/not-a-route").await.state, NavState::Allowed);

    let signed_in = NavigationGuard::new(FakeProbe::signed_in(true));
    let nav = signed_in.navigate("/menus/9/edit").await;
    assert_eq!(nav.state, NavState::Allowed);
    assert_eq!(nav.destination(), "/menus/9/edit");
    assert_eq!(nav.matched.unwrap().param("id"), Some("9"));
}

#[tokio::test]
async fn revoked_session_is_caught_on_next_navigation() {
    let probe = Arc::new(FakeProbe::signed_in(true));
    let guard = NavigationGuard::new(Arc::clone(&probe));

    assert_eq!(guard.navigate("/orders").await.state, NavState::Allowed);
    probe.authenticated.store(false, Ordering::SeqCst);
    assert_eq!(guard.navigate("/orders").await.state, NavState::RedirectedToLogin);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_attempts_each_check_and_are_serialized() {
    let probe = Arc::new(FakeProbe::signed_in(true));
    let guard = Arc::new(NavigationGuard::new(Arc::clone(&probe)));

    let handles: Vec<_> = ["/", "/menus", "/orders", "/login", "/orders/new"]
        .into_iter()
        .map(|location| {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move { guard.navigate(location).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(probe.calls.load(Ordering::SeqCst), 5);
    assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
}
