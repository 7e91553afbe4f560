//! Inventory Receipt Model
//!
//! 入库单与明细原子创建；每条明细对应一次商品库存加量。

use super::product::ProductCard;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Inventory receipt head record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReceipt {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Sequential human-readable code: I.0001, I.0002, ...
    pub code: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Σ(detail.amount × detail.import_price)
    pub total_money: f64,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub created_at: Option<String>,
}

/// Inventory receipt detail line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReceiptDetail {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub receipt: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub amount: i64,
    pub import_price: f64,
}

/// Detail line with the referenced product resolved, for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDetailWithProduct {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub amount: i64,
    pub import_price: f64,
    pub product: ProductCard,
}

/// Receipt head plus resolved detail lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReceiptFull {
    #[serde(flatten)]
    pub receipt: InventoryReceipt,
    pub details: Vec<ReceiptDetailWithProduct>,
}

// =============================================================================
// DTOs
// =============================================================================

/// One detail line in a create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDetailInput {
    /// Product id, either "product:xyz" or the bare key
    pub product: String,
    pub amount: i64,
    pub import_price: f64,
}

/// POST /api/inventory-receipts payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReceiptCreate {
    #[serde(default)]
    pub note: Option<String>,
    pub details: Vec<ReceiptDetailInput>,
}
