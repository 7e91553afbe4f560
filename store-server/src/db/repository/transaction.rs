//! Transaction Repository
//!
//! Append happens inside the order SUCCESS transition (see the order
//! repository); this side only reads the audit trail. Product references
//! are stored as "product:id" strings, matching what the rule miner reads.

use super::{BaseRepository, RepoResult};
use crate::db::models::Transaction;
use serde::Deserialize;
use std::collections::HashMap;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct TransactionRepository {
    base: BaseRepository,
}

impl TransactionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// How many recorded co-purchases each product appears in
    ///
    /// The global popularity signal for suggestion padding: SPLIT flattens
    /// the product_ids arrays, GROUP BY counts per product.
    pub async fn purchase_counts(&self) -> RepoResult<HashMap<RecordId, i64>> {
        #[derive(Debug, Deserialize)]
        struct Row {
            product: String,
            purchases: i64,
        }

        let rows: Vec<Row> = self
            .base
            .db()
            .query(
                "SELECT product_ids AS product, count() AS purchases \
                 FROM transaction SPLIT product_ids GROUP BY product",
            )
            .await?
            .take(0)?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.product.parse::<RecordId>().ok().map(|id| (id, r.purchases)))
            .collect())
    }

    /// Audit rows for one order (exactly one after a SUCCESS transition)
    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Vec<Transaction>> {
        let rows: Vec<Transaction> = self
            .base
            .db()
            .query("SELECT * FROM transaction WHERE `order` = $order")
            .bind(("order", order.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }
}
