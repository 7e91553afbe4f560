//! User Model (collaborator)
//!
//! User CRUD belongs to another part of the system; the order flow only
//! needs the owning user reference and the cart-clearing side effect.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Cart entries are written by the storefront client; this server only
    /// clears them when an order is placed, so the shape stays opaque here.
    #[serde(default)]
    pub cart: Vec<serde_json::Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
