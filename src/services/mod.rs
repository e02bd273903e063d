//! Resource services over the shared transport.
//!
//! DESIGN
//! ======
//! Every operation issues exactly one transport call and maps any failure
//! (network, non-2xx, unexpected body shape) into a [`ServiceError`] with the
//! operation's fallback message. The helpers here keep that contract in one
//! place.

pub mod auth;
pub mod menu;
pub mod order;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ServiceError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub use auth::AuthService;
pub use menu::MenuService;
pub use order::OrderService;

/// Run a JSON call and normalize its failure.
async fn call_json(transport: &dyn Transport, request: ApiRequest, fallback: &str) -> Result<Value, ServiceError> {
    transport
        .request(request)
        .await
        .and_then(ApiResponse::into_json)
        .map_err(|e| ServiceError::from_transport(&e, fallback))
}

/// Decode a whole response body.
fn decode<T: DeserializeOwned>(value: Value, fallback: &str) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, fallback, "unexpected response shape");
        ServiceError::fallback(fallback)
    })
}

/// Decode one field of a response body (`{"menu": {...}}` → `Menu`).
fn decode_field<T: DeserializeOwned>(mut value: Value, key: &str, fallback: &str) -> Result<T, ServiceError> {
    match value.get_mut(key).map(Value::take) {
        Some(field) => decode(field, fallback),
        None => {
            tracing::warn!(key, fallback, "response missing field");
            Err(ServiceError::fallback(fallback))
        }
    }
}

fn encode(body: &impl Serialize, fallback: &str) -> Result<Value, ServiceError> {
    serde_json::to_value(body).map_err(|e| {
        tracing::warn!(error = %e, fallback, "request body encode failed");
        ServiceError::fallback(fallback)
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
