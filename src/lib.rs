//! # bistro-admin
//!
//! Client layer for the restaurant ordering admin: session-gated navigation,
//! typed menu/order services over one cookie-carrying HTTP transport, and
//! PDF export of orders.
//!
//! Every service operation returns `Result<T, ServiceError>` whose message is
//! either the server's own or a fixed per-operation fallback. The session
//! status check is the exception: it never fails and reads errors as
//! "signed out".

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod navigation;
pub mod services;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use config::ClientConfig;
pub use error::{AuthError, ServiceError, TransportError};
