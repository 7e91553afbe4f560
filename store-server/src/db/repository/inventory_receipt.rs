//! Inventory Receipt Repository
//!
//! 入库单、明细和库存加量必须一起提交；任一商品不存在则整单回滚。

use super::{BaseRepository, RepoError, RepoResult, thrown_index};
use crate::db::models::{InventoryReceipt, InventoryReceiptDetail};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MISSING_PRODUCT_MARKER: &str = "MISSING_PRODUCT:";

/// One detail line as the write path consumes it
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    pub product: RecordId,
    pub amount: i64,
    pub import_price: f64,
}

#[derive(Clone)]
pub struct InventoryReceiptRepository {
    base: BaseRepository,
}

impl InventoryReceiptRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create the receipt, its detail rows and every stock increment as a
    /// single database transaction
    ///
    /// The guarded increments double-check product existence inside the
    /// transaction: if a product was deleted since validation, the whole
    /// receipt aborts instead of applying partially.
    pub async fn create_with_increments(
        &self,
        receipt: InventoryReceipt,
        lines: &[ReceiptLine],
    ) -> RepoResult<InventoryReceipt> {
        let code = receipt.code.clone();
        let now = receipt.created_at.clone().unwrap_or_default();

        // Detail rows carry their references in string form, matching the
        // rest of the data; $p{i} stays a record id for the UPDATE target.
        let mut statements = String::from(
            "BEGIN TRANSACTION;\n\
             LET $r = (CREATE ONLY inventory_receipt CONTENT $data);\n",
        );
        for i in 0..lines.len() {
            statements.push_str(&format!(
                "CREATE inventory_receipt_detail CONTENT {{ receipt: <string>$r.id, product: <string>$p{i}, amount: $n{i}, import_price: $ip{i} }};\n\
                 LET $u{i} = (UPDATE $p{i} SET amount += $n{i}, updated_at = $now);\n\
                 IF array::len($u{i}) = 0 {{ THROW '{MISSING_PRODUCT_MARKER}{i}' }};\n",
            ));
        }
        statements.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(statements)
            .bind(("data", receipt))
            .bind(("now", now));
        for (i, line) in lines.iter().enumerate() {
            query = query
                .bind((format!("p{i}"), line.product.clone()))
                .bind((format!("n{i}"), line.amount))
                .bind((format!("ip{i}"), line.import_price));
        }

        query.await?.check().map_err(map_receipt_error)?;

        self.find_by_code(&code)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Receipt {} vanished after create", code)))
    }

    /// Find receipt by its display code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<InventoryReceipt>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM inventory_receipt WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?;
        let receipts: Vec<InventoryReceipt> = result.take(0)?;
        Ok(receipts.into_iter().next())
    }

    /// Find receipt by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<InventoryReceipt>> {
        let receipt: Option<InventoryReceipt> = self.base.db().select(id.clone()).await?;
        Ok(receipt)
    }

    /// All receipts, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<InventoryReceipt>> {
        let receipts: Vec<InventoryReceipt> = self
            .base
            .db()
            .query("SELECT * FROM inventory_receipt ORDER BY code DESC")
            .await?
            .take(0)?;
        Ok(receipts)
    }

    /// Detail lines of one receipt; product resolution happens in the ledger
    pub async fn details_for(&self, receipt: &RecordId) -> RepoResult<Vec<InventoryReceiptDetail>> {
        let details: Vec<InventoryReceiptDetail> = self
            .base
            .db()
            .query("SELECT * FROM inventory_receipt_detail WHERE receipt = $receipt")
            .bind(("receipt", receipt.to_string()))
            .await?
            .take(0)?;
        Ok(details)
    }
}

/// Map a thrown transaction marker back to a typed repository error
fn map_receipt_error(err: surrealdb::Error) -> RepoError {
    let message = err.to_string();
    if let Some(idx) = thrown_index(&message, MISSING_PRODUCT_MARKER) {
        return RepoError::NotFound(format!("Product in receipt line {}", idx));
    }
    RepoError::Database(message)
}
