//! Inventory Ledger Service
//!
//! Owns every mutation of `product.amount`. The decrement primitive is a
//! single conditional update ("decrement by N only if current ≥ N"), so no
//! interleaving of receipts and confirmations can drive stock negative.

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    InventoryReceipt, InventoryReceiptCreate, InventoryReceiptFull, Product,
    ReceiptDetailWithProduct,
};
use crate::db::repository::sequence::{RECEIPT_SEQUENCE, format_code};
use crate::db::repository::{
    InventoryReceiptRepository, ProductRepository, ReceiptLine, RepoError, SequenceRepository,
    parse_record_id,
};
use crate::utils::{AppError, AppResult, ErrorCode, FieldError, validation_errors};

#[derive(Clone)]
pub struct InventoryLedger {
    db: Surreal<Db>,
    receipts: InventoryReceiptRepository,
    products: ProductRepository,
    sequences: SequenceRepository,
}

impl InventoryLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            receipts: InventoryReceiptRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            sequences: SequenceRepository::new(db.clone()),
            db,
        }
    }

    /// Record an inventory receipt and apply every stock increment
    ///
    /// Validation happens before any mutation: every referenced product must
    /// exist and every line must carry a positive amount, otherwise the
    /// whole receipt is rejected with a field-error list. The receipt, its
    /// details and the increments then commit as one database transaction.
    pub async fn receive_stock(
        &self,
        user: RecordId,
        payload: InventoryReceiptCreate,
    ) -> AppResult<InventoryReceiptFull> {
        if payload.details.is_empty() {
            return Err(AppError::validation("Receipt has no detail lines"));
        }

        let ids: Vec<RecordId> = payload
            .details
            .iter()
            .map(|d| parse_record_id("product", &d.product))
            .collect();

        // Existence + shape checks, all reported at once
        let found = self.products.find_cards_by_ids(&ids).await?;
        let mut errors: Vec<FieldError> = Vec::new();
        for (detail, id) in payload.details.iter().zip(&ids) {
            if !found.iter().any(|card| card.id == *id) {
                errors.push(FieldError::new(
                    "product",
                    "Product not found",
                    detail.product.clone(),
                ));
            }
            if detail.amount <= 0 {
                errors.push(FieldError::new(
                    "amount",
                    "Amount must be positive",
                    detail.amount,
                ));
            }
            if detail.import_price < 0.0 {
                errors.push(FieldError::new(
                    "importPrice",
                    "Import price cannot be negative",
                    detail.import_price,
                ));
            }
        }
        if !errors.is_empty() {
            return Err(validation_errors(errors));
        }

        let total_money: f64 = payload
            .details
            .iter()
            .map(|d| d.amount as f64 * d.import_price)
            .sum();

        let code = format_code('I', self.sequences.next(RECEIPT_SEQUENCE).await?);
        let receipt = InventoryReceipt {
            id: None,
            code,
            note: payload.note,
            total_money,
            user,
            created_at: Some(Utc::now().to_rfc3339()),
        };

        let lines: Vec<ReceiptLine> = payload
            .details
            .iter()
            .zip(ids)
            .map(|(d, product)| ReceiptLine {
                product,
                amount: d.amount,
                import_price: d.import_price,
            })
            .collect();

        let created = self.receipts.create_with_increments(receipt, &lines).await?;

        tracing::info!(code = %created.code, lines = lines.len(), "Inventory receipt recorded");

        self.load_full(created).await
    }

    /// Atomic conditional decrement of one product's stock
    ///
    /// Fails with `ProductOutOfStock` instead of clamping; never leaves
    /// `amount` negative, no matter what runs concurrently.
    pub async fn decrement_stock(&self, product: &RecordId, amount: i64) -> AppResult<Product> {
        if amount <= 0 {
            return Err(AppError::validation("Decrement amount must be positive"));
        }
        let mut result = self
            .db
            .query(
                "UPDATE $product SET amount -= $n, updated_at = $now \
                 WHERE amount >= $n RETURN AFTER",
            )
            .bind(("product", product.clone()))
            .bind(("n", amount))
            .bind(("now", Utc::now().to_rfc3339()))
            .await
            .map_err(RepoError::from)?;
        let updated: Vec<Product> = result.take(0).map_err(RepoError::from)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::new(ErrorCode::ProductOutOfStock))
    }

    /// Decrement every order line and flip the order PENDING → CONFIRMED in
    /// one database transaction
    ///
    /// Delegates to the order repository so the guard and the decrements
    /// share a transaction boundary; all stock writes still route through
    /// this service.
    pub async fn confirm_order(
        &self,
        order_id: &RecordId,
        lines: &[(RecordId, i64)],
        note: Option<String>,
    ) -> Result<(), RepoError> {
        crate::db::repository::OrderRepository::new(self.db.clone())
            .confirm_and_decrement(order_id, lines, note)
            .await
    }

    /// Receipt with resolved detail lines
    pub async fn get_receipt(&self, id: &RecordId) -> AppResult<InventoryReceiptFull> {
        let receipt = self
            .receipts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Receipt {}", id)))?;
        self.load_full(receipt).await
    }

    /// All receipts, newest first (admin list; details not expanded)
    pub async fn list_receipts(&self) -> AppResult<Vec<InventoryReceipt>> {
        Ok(self.receipts.find_all().await?)
    }

    /// Preview the next receipt code without consuming it
    pub async fn next_code(&self) -> AppResult<String> {
        Ok(format_code('I', self.sequences.peek(RECEIPT_SEQUENCE).await?))
    }

    async fn load_full(&self, receipt: InventoryReceipt) -> AppResult<InventoryReceiptFull> {
        let rows = match &receipt.id {
            Some(id) => self.receipts.details_for(id).await?,
            None => Vec::new(),
        };

        // Resolve the product references in one query and zip them back in
        let ids: Vec<RecordId> = rows.iter().map(|d| d.product.clone()).collect();
        let cards = self.products.find_cards_by_ids(&ids).await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let product = cards
                .iter()
                .find(|card| card.id == row.product)
                .cloned()
                .ok_or_else(|| {
                    AppError::database(format!("Receipt detail references missing {}", row.product))
                })?;
            details.push(ReceiptDetailWithProduct {
                id: row.id,
                amount: row.amount,
                import_price: row.import_price,
                product,
            });
        }

        Ok(InventoryReceiptFull { receipt, details })
    }
}
