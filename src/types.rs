//! Wire types for the admin API.
//!
//! DESIGN
//! ======
//! Entities are passed through rather than validated. Only the identifier is
//! required; every other field the server sends (including nulls and keys this
//! crate has never heard of) is kept verbatim in `fields` and re-serializes
//! unchanged. Typed accessors read the well-known keys and return `None` when
//! a key is absent, null or of an unexpected type.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// IDENTIFIERS & FILTERS
// =============================================================================

/// Opaque entity identifier; the server may use numbers or strings.
///
/// Strings are never reinterpreted: `"007"` stays `"007"` in paths and
/// filenames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Listing/export filter forwarded verbatim as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams(BTreeMap<String, String>);

impl ListParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn status(self, status: impl ToString) -> Self {
        self.with("status", status)
    }

    #[must_use]
    pub fn category(self, category: impl ToString) -> Self {
        self.with("category", category)
    }

    #[must_use]
    pub fn search(self, search: impl ToString) -> Self {
        self.with("search", search)
    }

    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.with("page", page)
    }

    #[must_use]
    pub fn per_page(self, per_page: u32) -> Self {
        self.with("per_page", per_page)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn f64_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64)
}

fn id_field(fields: &Map<String, Value>, key: &str) -> Option<EntityId> {
    match fields.get(key)? {
        Value::Number(n) => n.as_i64().map(EntityId::Num),
        Value::String(s) => Some(EntityId::Text(s.clone())),
        _ => None,
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserProfile {
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        str_field(&self.fields, "username")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserProfile,
}

/// Bare acknowledgement (`{"message": ...}`) returned by logout and deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// MENUS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Menu {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        str_field(&self.fields, "description")
    }

    #[must_use]
    pub fn price(&self) -> Option<f64> {
        f64_field(&self.fields, "price")
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        str_field(&self.fields, "category")
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        str_field(&self.fields, "image_url")
    }

    #[must_use]
    pub fn is_available(&self) -> Option<bool> {
        self.fields.get("is_available").and_then(Value::as_bool)
    }
}

/// Pagination envelope counters; absent counters stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPage {
    pub menus: Vec<Menu>,
    #[serde(flatten)]
    pub paging: PageInfo,
}

/// Fields for creating or updating a menu item; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuMutation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub menu: Menu,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub image_url: String,
}

// =============================================================================
// ORDERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status '{other}' (expected pending, completed or cancelled)")),
        }
    }
}

/// One line of an order, kept exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItem {
    pub fields: Map<String, Value>,
}

impl OrderItem {
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        id_field(&self.fields, "id")
    }

    #[must_use]
    pub fn menu_id(&self) -> Option<EntityId> {
        id_field(&self.fields, "menu_id")
    }

    #[must_use]
    pub fn menu_name(&self) -> Option<&str> {
        str_field(&self.fields, "menu_name")
    }

    #[must_use]
    pub fn quantity(&self) -> Option<u64> {
        self.fields.get("quantity").and_then(Value::as_u64)
    }

    #[must_use]
    pub fn price(&self) -> Option<f64> {
        f64_field(&self.fields, "price")
    }

    #[must_use]
    pub fn subtotal(&self) -> Option<f64> {
        f64_field(&self.fields, "subtotal")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Order {
    #[must_use]
    pub fn customer_name(&self) -> Option<&str> {
        str_field(&self.fields, "customer_name")
    }

    /// Raw status string; the server may send values newer than [`OrderStatus`].
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        str_field(&self.fields, "status")
    }

    #[must_use]
    pub fn total_amount(&self) -> Option<f64> {
        f64_field(&self.fields, "total_amount")
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        str_field(&self.fields, "notes")
    }

    /// Object entries of `order_items`; anything else in the array is skipped.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.fields
            .get("order_items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_object().map(|fields| OrderItem { fields: fields.clone() }))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    #[serde(flatten)]
    pub paging: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub menu_id: EntityId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderItemDraft>,
}

/// Partial order update; unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemDraft>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMutation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub order: Order,
}

/// Result of a completed PDF export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
    pub file_name: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
