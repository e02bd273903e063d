//! Menu item CRUD, categories and image upload.

use std::sync::Arc;

use super::{call_json, decode, decode_field, encode};
use crate::error::ServiceError;
use crate::transport::{ApiRequest, FileUpload, Transport};
use crate::types::{Ack, EntityId, ImageUpload, ListParams, Menu, MenuDraft, MenuMutation, MenuPage};

pub const FETCH_MENUS_FAILED: &str = "Failed to fetch menus";
pub const FETCH_MENU_FAILED: &str = "Failed to fetch menu";
pub const CREATE_MENU_FAILED: &str = "Failed to create menu";
pub const UPDATE_MENU_FAILED: &str = "Failed to update menu";
pub const DELETE_MENU_FAILED: &str = "Failed to delete menu";
pub const FETCH_CATEGORIES_FAILED: &str = "Failed to fetch categories";
pub const UPLOAD_IMAGE_FAILED: &str = "Failed to upload image";

/// Multipart field the upload endpoint reads the file from.
const IMAGE_FIELD: &str = "image";

#[derive(Clone)]
pub struct MenuService {
    transport: Arc<dyn Transport>,
}

impl MenuService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// List menu items; `params` (category, search, page, ...) go out as-is.
    ///
    /// # Errors
    ///
    /// Returns the server's message or `"Failed to fetch menus"`.
    pub async fn list_menus(&self, params: &ListParams) -> Result<MenuPage, ServiceError> {
        let request = ApiRequest::get("/menus").query(params.to_query());
        let body = call_json(self.transport(), request, FETCH_MENUS_FAILED).await?;
        decode(body, FETCH_MENUS_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to fetch menu"`.
    pub async fn get_menu(&self, id: impl Into<EntityId>) -> Result<Menu, ServiceError> {
        let request = ApiRequest::get(format!("/menus/{}", id.into()));
        let body = call_json(self.transport(), request, FETCH_MENU_FAILED).await?;
        decode_field(body, "menu", FETCH_MENU_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to create menu"`.
    pub async fn create_menu(&self, draft: &MenuDraft) -> Result<MenuMutation, ServiceError> {
        let request = ApiRequest::post("/menus").json(encode(draft, CREATE_MENU_FAILED)?);
        let body = call_json(self.transport(), request, CREATE_MENU_FAILED).await?;
        decode(body, CREATE_MENU_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to update menu"`.
    pub async fn update_menu(&self, id: impl Into<EntityId>, draft: &MenuDraft) -> Result<MenuMutation, ServiceError> {
        let request = ApiRequest::put(format!("/menus/{}", id.into())).json(encode(draft, UPDATE_MENU_FAILED)?);
        let body = call_json(self.transport(), request, UPDATE_MENU_FAILED).await?;
        decode(body, UPDATE_MENU_FAILED)
    }

    /// # Errors
    ///
    /// Returns the server's message or `"Failed to delete menu"`.
    pub async fn delete_menu(&self, id: impl Into<EntityId>) -> Result<Ack, ServiceError> {
        let request = ApiRequest::delete(format!("/menus/{}", id.into()));
        let body = call_json(self.transport(), request, DELETE_MENU_FAILED).await?;
        decode(body, DELETE_MENU_FAILED)
    }

    /// Distinct categories currently in use.
    ///
    /// # Errors
    ///
    /// Returns the server's message or `"Failed to fetch categories"`.
    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        let body = call_json(self.transport(), ApiRequest::get("/menus/categories"), FETCH_CATEGORIES_FAILED).await?;
        decode_field(body, "categories", FETCH_CATEGORIES_FAILED)
    }

    /// Upload a menu image as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns the server's message (e.g. a rejected file type) or
    /// `"Failed to upload image"`.
    pub async fn upload_image(&self, file: FileUpload) -> Result<ImageUpload, ServiceError> {
        let request = ApiRequest::post("/menus/upload-image").multipart(IMAGE_FIELD, file);
        let body = call_json(self.transport(), request, UPLOAD_IMAGE_FAILED).await?;
        decode(body, UPLOAD_IMAGE_FAILED)
    }
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
