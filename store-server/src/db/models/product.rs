//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Catalog product
///
/// `amount` is the current stock level. It has exactly two writers, both in
/// the inventory ledger: receipts increment it, order confirmation
/// decrements it. It must never drop below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub unit: String,
    pub price: f64,
    /// Current stock level, integer ≥ 0
    #[serde(default)]
    pub amount: i64,
    /// Soft "still sellable" flag
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    /// Record link to category
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Product projection for display surfaces (suggestions, receipt details)
///
/// Matches the field subset the storefront renders on a product card;
/// `category_name` is resolved from the category link at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCard {
    #[serde(with = "serde_helpers::record_id")]
    pub id: ProductId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub amount: i64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(default)]
    pub category_name: Option<String>,
}
