//! Order CRUD, status transitions and PDF export.
//!
//! Export calls run in binary mode end to end: the payload is never JSON
//! decoded, and the file is handed to the [`ArtifactSink`] rather than
//! returned. A staged artifact is always released, even when saving fails.

use std::sync::Arc;

use serde_json::json;

use super::{call_json, decode, decode_field, encode};
use crate::error::ServiceError;
use crate::export::{ArtifactSink, Clock, ExportArtifact, SystemClock, order_export_file_name, orders_export_file_name};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::types::{
    Ack, EntityId, ExportOutcome, ListParams, Order, OrderDraft, OrderMutation, OrderPage, OrderPatch, OrderStatus,
};

pub const FETCH_ORDERS_FAILED: &str = "Failed to fetch orders";
pub const FETCH_ORDER_FAILED: &str = "Failed to fetch order";
pub const CREATE_ORDER_FAILED: &str = "Failed to create order";
pub const UPDATE_ORDER_FAILED: &str = "Failed to update order";
pub const UPDATE_ORDER_STATUS_FAILED: &str = "Failed to update order status";
pub const DELETE_ORDER_FAILED: &str = "Failed to delete order";
pub const EXPORT_ORDERS_FAILED: &str = "Failed to export orders PDF";
pub const EXPORT_ORDER_FAILED: &str = "Failed to export order PDF";

const EXPORT_ORDERS_OK: &str = "PDF exported successfully";
const EXPORT_ORDER_OK: &str = "Order PDF exported successfully";

#[derive(Clone)]
pub struct OrderService {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn ArtifactSink>,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self { transport, sink, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used for export date stamps.
    #[must_use]
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self { clock, ..self }
    }

    fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to fetch orders"`.
    pub async fn list_orders(&self, params: &ListParams) -> Result<OrderPage, ServiceError> {
        let request = ApiRequest::get("/orders").query(params.to_query());
        let body = call_json(self.transport(), request, FETCH_ORDERS_FAILED).await?;
        decode(body, FETCH_ORDERS_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to fetch order"`.
    pub async fn get_order(&self, id: impl Into<EntityId>) -> Result<Order, ServiceError> {
        let request = ApiRequest::get(format!("/orders/{}", id.into()));
        let body = call_json(self.transport(), request, FETCH_ORDER_FAILED).await?;
        decode_field(body, "order", FETCH_ORDER_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to create order"`.
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<OrderMutation, ServiceError> {
        let request = ApiRequest::post("/orders").json(encode(draft, CREATE_ORDER_FAILED)?);
        let body = call_json(self.transport(), request, CREATE_ORDER_FAILED).await?;
        decode(body, CREATE_ORDER_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to update order"`.
    pub async fn update_order(&self, id: impl Into<EntityId>, patch: &OrderPatch) -> Result<OrderMutation, ServiceError> {
        let request = ApiRequest::put(format!("/orders/{}", id.into())).json(encode(patch, UPDATE_ORDER_FAILED)?);
        let body = call_json(self.transport(), request, UPDATE_ORDER_FAILED).await?;
        decode(body, UPDATE_ORDER_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to update order status"`.
    pub async fn update_order_status(
        &self,
        id: impl Into<EntityId>,
        status: OrderStatus,
    ) -> Result<OrderMutation, ServiceError> {
        let request = ApiRequest::put(format!("/orders/{}/status", id.into())).json(json!({ "status": status }));
        let body = call_json(self.transport(), request, UPDATE_ORDER_STATUS_FAILED).await?;
        decode(body, UPDATE_ORDER_STATUS_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to delete order"`.
    pub async fn delete_order(&self, id: impl Into<EntityId>) -> Result<Ack, ServiceError> {
        let request = ApiRequest::delete(format!("/orders/{}", id.into()));
        let body = call_json(self.transport(), request, DELETE_ORDER_FAILED).await?;
        decode(body, DELETE_ORDER_FAILED)
    }

    /// Export the orders matching `params` as one PDF and save it.
    ///
    /// The file is named `orders_<status|all>_<YYYY-MM-DD>.pdf`.
    ///
    /// # Errors
    ///
    /// Returns the server's message or `"Failed to export orders PDF"`; a
    /// failed save also yields the fallback.
    pub async fn export_orders_pdf(&self, params: &ListParams) -> Result<ExportOutcome, ServiceError> {
        let request = ApiRequest::get("/orders/export-pdf").query(params.to_query()).binary();
        let file_name = orders_export_file_name(params, self.clock.today());
        self.export(request, file_name, EXPORT_ORDERS_OK, EXPORT_ORDERS_FAILED).await
    }

    /// Export one order as a PDF named `order_<id>_<YYYY-MM-DD>.pdf`.
    ///
    /// # Errors
    ///
    /// Returns the server's message or `"Failed to export order PDF"`.
    pub async fn export_order_pdf(&self, id: impl Into<EntityId>) -> Result<ExportOutcome, ServiceError> {
        let id = id.into();
        let request = ApiRequest::get(format!("/orders/{id}/export-pdf")).binary();
        let file_name = order_export_file_name(&id, self.clock.today());
        self.export(request, file_name, EXPORT_ORDER_OK, EXPORT_ORDER_FAILED).await
    }

    async fn export(
        &self,
        request: ApiRequest,
        file_name: String,
        message: &str,
        fallback: &str,
    ) -> Result<ExportOutcome, ServiceError> {
        let bytes = self
            .transport
            .request(request)
            .await
            .and_then(ApiResponse::into_bytes)
            .map_err(|e| ServiceError::from_transport(&e, fallback))?;

        let sink_failed = |e: crate::export::SinkError| {
            tracing::warn!(error = %e, file_name = %file_name, "export save failed");
            ServiceError::fallback(fallback)
        };

        let staged = self.sink.stage(ExportArtifact::pdf(bytes)).await.map_err(sink_failed)?;
        let saved = self.sink.save(&staged, &file_name).await;
        self.sink.release(staged).await;
        saved.map_err(sink_failed)?;

        tracing::info!(file_name = %file_name, "orders exported");
        Ok(ExportOutcome { success: true, message: message.to_owned(), file_name })
    }
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
