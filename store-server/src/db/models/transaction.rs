//! Transaction Model
//!
//! An audit record of products co-purchased in one successful order,
//! the ground truth the offline rule miner consumes. Append-only;
//! written exactly once when an order reaches SUCCESS.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub order: Option<RecordId>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub product_ids: Vec<RecordId>,
    pub created_at: Option<String>,
}
