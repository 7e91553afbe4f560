//! Order Model
//!
//! 订单一旦创建，商品行就是不可变的快照；价格、名称等目录字段
//! 后续变化不会影响已下的订单。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// Order lifecycle status
///
/// The graph is strictly forward: Pending → Confirmed → Success.
/// Cancellation is represented by deleting a Pending order; there is no
/// backward edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Success,
}

impl OrderStatus {
    /// Whether the lifecycle graph allows moving from `self` to `target`
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Success)
        )
    }

    /// Storage representation, used in transaction guards
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Success => "SUCCESS",
        }
    }
}

/// One order line: a denormalized snapshot of the product at order time
/// plus the requested amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub unit: String,
    /// Price at order time; never updated afterwards
    pub price: f64,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Requested amount
    pub amount: i64,
    /// Live stock at read time. UI display only, never persisted as truth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_in_system: Option<i64>,
}

/// Customer contact data copied onto the order at creation time
/// (not joined live, so later account edits don't rewrite history)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    /// Sequential human-readable code: O.0001, O.0002, ...
    pub code: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub note: Option<String>,
    /// Σ(line.amount × line.price) at creation time, never recomputed
    pub total_money: f64,
    pub customer: CustomerInfo,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub products: Vec<OrderLine>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

// =============================================================================
// DTOs
// =============================================================================

/// One requested cart line in a create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    /// Product id, either "product:xyz" or the bare key
    pub product: String,
    pub amount: i64,
}

/// POST /api/orders payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub products: Vec<OrderLineInput>,
    pub customer: CustomerInfo,
    #[serde(default)]
    pub note: Option<String>,
}

/// PUT /api/orders/:id payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub note: Option<String>,
}
