//! Order Repository
//!
//! 状态翻转一律在数据库事务内加 WHERE status 守卫：
//! 重复确认不会二次扣库存，Success 只会写一条 transaction 审计记录。

use super::{BaseRepository, RepoError, RepoResult, thrown_index, was_thrown};
use crate::db::models::Order;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_STATE_MARKER: &str = "ORDER_STATE:";
const OUT_OF_STOCK_MARKER: &str = "OUT_OF_STOCK:";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// Find order by its display code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders, newest first (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY code DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders placed by one user, newest first
    ///
    /// The user reference is stored as a "user:id" string (see the model's
    /// serde helpers), so the comparison binds the string form.
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY code DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Create the order and clear the owning user's cart as one unit
    ///
    /// If the order write fails the whole transaction aborts and the cart
    /// stays intact.
    pub async fn create_clearing_cart(&self, order: Order, user: RecordId) -> RepoResult<Order> {
        let code = order.code.clone();
        let now = order.created_at.clone().unwrap_or_default();

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION;\n\
                 CREATE order CONTENT $data;\n\
                 UPDATE $user SET cart = [], updated_at = $now;\n\
                 COMMIT TRANSACTION;",
            )
            .bind(("data", order))
            .bind(("user", user))
            .bind(("now", now))
            .await?
            .check()?;

        self.find_by_code(&code)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Order {} vanished after create", code)))
    }

    /// Flip PENDING → CONFIRMED and apply every stock decrement in one
    /// database transaction
    ///
    /// Each line decrements only if `amount >= requested`; the first line
    /// that cannot throws and aborts the whole transaction, so partial
    /// application is impossible. The status guard makes re-confirmation a
    /// clean error instead of a double decrement.
    pub async fn confirm_and_decrement(
        &self,
        order_id: &RecordId,
        lines: &[(RecordId, i64)],
        note: Option<String>,
    ) -> RepoResult<()> {
        let note_clause = if note.is_some() { ", note = $note" } else { "" };
        let mut statements = format!(
            "BEGIN TRANSACTION;\n\
             LET $flipped = (UPDATE $order SET status = 'CONFIRMED', updated_at = $now{note_clause} WHERE status = 'PENDING');\n\
             IF array::len($flipped) = 0 {{ THROW '{ORDER_STATE_MARKER}0' }};\n",
        );
        for i in 0..lines.len() {
            statements.push_str(&format!(
                "LET $u{i} = (UPDATE $p{i} SET amount -= $n{i}, updated_at = $now WHERE amount >= $n{i});\n\
                 IF array::len($u{i}) = 0 {{ THROW '{OUT_OF_STOCK_MARKER}{i}' }};\n",
            ));
        }
        statements.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(statements)
            .bind(("order", order_id.clone()))
            .bind(("now", chrono::Utc::now().to_rfc3339()));
        if let Some(note) = note {
            query = query.bind(("note", note));
        }
        for (i, (product, amount)) in lines.iter().enumerate() {
            query = query
                .bind((format!("p{i}"), product.clone()))
                .bind((format!("n{i}"), *amount));
        }

        query.await?.check().map_err(map_transition_error)?;
        Ok(())
    }

    /// Flip CONFIRMED → SUCCESS and append the co-purchase audit record in
    /// one database transaction
    pub async fn complete_recording_transaction(
        &self,
        order_id: &RecordId,
        product_ids: Vec<RecordId>,
        note: Option<String>,
    ) -> RepoResult<()> {
        let note_clause = if note.is_some() { ", note = $note" } else { "" };
        // References inside the audit record are stored in string form,
        // same as everywhere else outside primary keys.
        let statements = format!(
            "BEGIN TRANSACTION;\n\
             LET $flipped = (UPDATE $order SET status = 'SUCCESS', updated_at = $now{note_clause} WHERE status = 'CONFIRMED');\n\
             IF array::len($flipped) = 0 {{ THROW '{ORDER_STATE_MARKER}0' }};\n\
             CREATE transaction CONTENT {{ order: <string>$order, product_ids: $pids, created_at: $now }};\n\
             COMMIT TRANSACTION;",
        );

        let pid_strings: Vec<String> = product_ids.iter().map(|p| p.to_string()).collect();
        let mut query = self
            .base
            .db()
            .query(statements)
            .bind(("order", order_id.clone()))
            .bind(("pids", pid_strings))
            .bind(("now", chrono::Utc::now().to_rfc3339()));
        if let Some(note) = note {
            query = query.bind(("note", note));
        }

        query.await?.check().map_err(map_transition_error)?;
        Ok(())
    }

    /// Delete an order (cancellation while PENDING, or admin removal)
    pub async fn delete(&self, id: &RecordId) -> RepoResult<Order> {
        let deleted: Option<Order> = self.base.db().delete(id.clone()).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Order {}", id)))
    }
}

/// Map a thrown transaction marker back to a typed repository error
fn map_transition_error(err: surrealdb::Error) -> RepoError {
    let message = err.to_string();
    if was_thrown(&message, ORDER_STATE_MARKER) {
        return RepoError::StateConflict("Order status changed before the update".into());
    }
    if let Some(idx) = thrown_index(&message, OUT_OF_STOCK_MARKER) {
        return RepoError::InsufficientStock(idx);
    }
    RepoError::Database(message)
}
