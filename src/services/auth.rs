//! Session endpoints: login, logout, status and current user.
//!
//! `check_auth` is deliberately total: the navigation guard calls it on every
//! transition and must never have to handle an error from it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{call_json, decode, decode_field};
use crate::error::AuthError;
use crate::navigation::SessionProbe;
use crate::transport::{ApiRequest, Transport};
use crate::types::{Ack, SessionResult, UserProfile};

pub const LOGIN_FAILED: &str = "Login failed";
pub const LOGOUT_FAILED: &str = "Logout failed";
pub const CURRENT_USER_FAILED: &str = "Failed to get user info";

#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
}

impl AuthService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Exchange credentials for a session cookie.
    ///
    /// # Errors
    ///
    /// Returns the server's message (e.g. invalid credentials) or `"Login failed"`.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionResult, AuthError> {
        let request = ApiRequest::post("/auth/login").json(json!({ "username": username, "password": password }));
        let body = call_json(self.transport.as_ref(), request, LOGIN_FAILED).await?;
        decode(body, LOGIN_FAILED)
    }

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns the server's message or `"Logout failed"`.
    pub async fn logout(&self) -> Result<Ack, AuthError> {
        let body = call_json(self.transport.as_ref(), ApiRequest::post("/auth/logout"), LOGOUT_FAILED).await?;
        decode(body, LOGOUT_FAILED)
    }

    /// Ask the server whether the current session is authenticated.
    ///
    /// Any failure, including a malformed body, reads as `false`.
    pub async fn check_auth(&self) -> bool {
        match self.transport.request(ApiRequest::get("/auth/status")).await {
            Ok(response) => response
                .into_json()
                .ok()
                .and_then(|body| body.get("authenticated").and_then(Value::as_bool))
                .unwrap_or(false),
            Err(e) => {
                tracing::debug!(error = %e, "auth status check failed; treating as signed out");
                false
            }
        }
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the server's message or `"Failed to get user info"`.
    pub async fn current_user(&self) -> Result<UserProfile, AuthError> {
        let body = call_json(self.transport.as_ref(), ApiRequest::get("/auth/me"), CURRENT_USER_FAILED).await?;
        decode_field(body, "user", CURRENT_USER_FAILED)
    }
}

#[async_trait]
impl SessionProbe for AuthService {
    async fn is_authenticated(&self) -> bool {
        self.check_auth().await
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
