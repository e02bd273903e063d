//! One-per-process bundle of the resource services and the navigation guard.
//!
//! All services share a single transport (and therefore one cookie jar), so
//! a login through `auth` is visible to `menus`, `orders` and the guard.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::export::{ArtifactSink, DirectorySink};
use crate::navigation::NavigationGuard;
use crate::services::{AuthService, MenuService, OrderService};
use crate::transport::{HttpTransport, Transport};

pub struct AdminClient {
    pub auth: AuthService,
    pub menus: MenuService,
    pub orders: OrderService,
    guard: NavigationGuard<AuthService>,
}

impl AdminClient {
    /// Build the HTTP transport and a download-directory sink from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(HttpTransport::new(config)?);
        let sink = Arc::new(DirectorySink::new(config.download_dir.clone()));
        Ok(Self::from_parts(transport, sink))
    }

    #[must_use]
    pub fn from_parts(transport: Arc<dyn Transport>, sink: Arc<dyn ArtifactSink>) -> Self {
        let auth = AuthService::new(Arc::clone(&transport));
        Self {
            menus: MenuService::new(Arc::clone(&transport)),
            orders: OrderService::new(transport, sink),
            guard: NavigationGuard::new(auth.clone()),
            auth,
        }
    }

    #[must_use]
    pub fn guard(&self) -> &NavigationGuard<AuthService> {
        &self.guard
    }
}
