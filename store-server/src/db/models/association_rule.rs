//! Association Rule Model
//!
//! 规则由外部离线挖掘任务整批刷新；在线系统只读。

use super::product::ProductCard;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Mined association rule: "if antecedent products are bought, consequent
/// products are also likely bought"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationRule {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub antecedents: Vec<RecordId>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub consequents: Vec<RecordId>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    pub confidence: f64,
    /// lift > 1 means co-occurrence stronger than chance, the primary
    /// ranking signal
    pub lift: f64,
}

/// Rule with both product lists resolved, for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationRuleFull {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub product_antecedents: Vec<ProductCard>,
    pub product_consequents: Vec<ProductCard>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// The projection the suggestion pipeline ranks on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMatch {
    pub lift: f64,
    pub confidence: f64,
    pub support: f64,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub consequents: Vec<RecordId>,
}
