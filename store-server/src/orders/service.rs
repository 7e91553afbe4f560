//! Order State Machine Service
//!
//! Stock checking happens twice by design: an advisory check at creation
//! (nothing is reserved, the shopper just gets an early error) and the
//! authoritative conditional decrement inside the confirmation transaction.
//! Two shoppers can therefore both place an order for the last unit; only
//! one confirmation will go through, the other surfaces the stock error
//! at confirmation time.

use chrono::Utc;
use serde_json::json;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{
    Order, OrderCreate, OrderLine, OrderLineInput, OrderStatus, OrderUpdate, ProductCard,
};
use crate::db::repository::sequence::{ORDER_SEQUENCE, format_code};
use crate::db::repository::{
    OrderRepository, ProductRepository, RepoError, SequenceRepository, parse_record_id,
};
use crate::inventory::InventoryLedger;
use crate::services::MailService;
use crate::utils::{AppError, AppResult, ErrorCode, FieldError, validation_errors};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    products: ProductRepository,
    sequences: SequenceRepository,
    ledger: InventoryLedger,
    mail: MailService,
}

impl OrderService {
    pub fn new(db: Surreal<Db>, mail: MailService) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            sequences: SequenceRepository::new(db.clone()),
            ledger: InventoryLedger::new(db),
            mail,
        }
    }

    /// Place a new order from the shopper's cart lines
    ///
    /// Validates stock and product state, snapshots every line, computes
    /// the total, then creates the order and clears the cart as one unit.
    pub async fn create(&self, user: &CurrentUser, payload: OrderCreate) -> AppResult<Order> {
        if payload.products.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }

        let mut errors = crate::utils::validation::validate_customer(&payload.customer);

        let ids: Vec<RecordId> = payload
            .products
            .iter()
            .map(|line| parse_record_id("product", &line.product))
            .collect();
        let cards = self.products.find_cards_by_ids(&ids).await?;

        let mut lines: Vec<OrderLine> = Vec::with_capacity(payload.products.len());
        for (input, id) in payload.products.iter().zip(&ids) {
            match cards.iter().find(|card| card.id == *id) {
                Some(card) => errors.extend(check_line(input, card, &mut lines)),
                None => errors.push(FieldError::new(
                    "product",
                    "Product not found",
                    input.product.clone(),
                )),
            }
        }
        if !errors.is_empty() {
            return Err(validation_errors(errors));
        }

        let total_money: f64 = lines.iter().map(|l| l.amount as f64 * l.price).sum();
        let code = format_code('O', self.sequences.next(ORDER_SEQUENCE).await?);
        let now = Utc::now().to_rfc3339();

        let order = Order {
            id: None,
            code,
            status: OrderStatus::Pending,
            note: payload.note,
            total_money,
            customer: payload.customer,
            user: user.record_id(),
            products: lines,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created = self
            .orders
            .create_clearing_cart(order, user.record_id())
            .await?;

        tracing::info!(code = %created.code, total = created.total_money, "Order placed");

        Ok(created)
    }

    /// Fetch one order; pending orders get their lines annotated with the
    /// live stock level for the UI
    pub async fn get(&self, user: &CurrentUser, id: &RecordId) -> AppResult<Order> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !user.owns_or_admin(&order.user) {
            return Err(AppError::permission_denied("Not your order"));
        }

        if order.status == OrderStatus::Pending {
            self.annotate_live_stock(&mut order).await?;
        }

        Ok(order)
    }

    /// Admins see every order, customers their own
    pub async fn list(&self, user: &CurrentUser) -> AppResult<Vec<Order>> {
        let orders = if user.is_admin {
            self.orders.find_all().await?
        } else {
            self.orders.find_by_user(&user.record_id()).await?
        };
        Ok(orders)
    }

    /// Drive the order through the lifecycle graph
    ///
    /// Admin-only (enforced at the route). Confirmation re-validates stock
    /// and decrements it atomically with the status flip; success appends
    /// the co-purchase audit record.
    pub async fn transition(&self, id: &RecordId, update: OrderUpdate) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !order.status.can_transition_to(update.status) {
            return Err(AppError::with_message(
                ErrorCode::IllegalTransition,
                format!(
                    "Cannot move order from {} to {}",
                    order.status.as_str(),
                    update.status.as_str()
                ),
            ));
        }

        match update.status {
            OrderStatus::Confirmed => self.confirm(order, update.note).await,
            OrderStatus::Success => self.complete(order, update.note).await,
            // Unreachable: no edge leads back to PENDING
            OrderStatus::Pending => Err(AppError::new(ErrorCode::IllegalTransition)),
        }
    }

    /// Cancel / remove an order
    ///
    /// Customers may only cancel their own order while it is still pending.
    /// Admins may delete at any status, with the documented caveat that
    /// deleting a confirmed order does not restock.
    pub async fn delete(&self, user: &CurrentUser, id: &RecordId) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !user.is_admin {
            if order.user != user.record_id() {
                return Err(AppError::permission_denied("Not your order"));
            }
            if order.status != OrderStatus::Pending {
                return Err(AppError::with_message(
                    ErrorCode::OrderStateConflict,
                    "Only pending orders can be cancelled",
                ));
            }
        } else if order.status != OrderStatus::Pending {
            tracing::warn!(code = %order.code, status = order.status.as_str(), "Deleting a non-pending order; stock is not restored");
        }

        let deleted = self.orders.delete(id).await?;
        tracing::info!(code = %deleted.code, "Order removed");
        Ok(deleted)
    }

    /// Preview the next order code without consuming it
    pub async fn next_code(&self) -> AppResult<String> {
        Ok(format_code('O', self.sequences.peek(ORDER_SEQUENCE).await?))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    async fn confirm(&self, order: Order, note: Option<String>) -> AppResult<Order> {
        let order_id = order_record_id(&order)?;

        // Advisory pre-check so the admin gets the full error list; the
        // transaction below re-checks each line authoritatively.
        let ids: Vec<RecordId> = order.products.iter().map(|l| l.product.clone()).collect();
        let cards = self.products.find_cards_by_ids(&ids).await?;
        let mut errors: Vec<FieldError> = Vec::new();
        for line in &order.products {
            match cards.iter().find(|card| card.id == line.product) {
                Some(card) if !card.is_active => {
                    errors.push(line_error(line.code.clone(), line.name.clone(), "Product is no longer sellable", None));
                }
                Some(card) if card.amount < line.amount => {
                    errors.push(line_error(
                        line.code.clone(),
                        line.name.clone(),
                        "The requested amount exceeds the current stock",
                        Some(card.amount),
                    ));
                }
                Some(_) => {}
                None => {
                    errors.push(line_error(line.code.clone(), line.name.clone(), "Product no longer exists", None));
                }
            }
        }
        if !errors.is_empty() {
            return Err(validation_errors(errors));
        }

        let lines: Vec<(RecordId, i64)> = order
            .products
            .iter()
            .map(|l| (l.product.clone(), l.amount))
            .collect();

        self.ledger
            .confirm_order(&order_id, &lines, note)
            .await
            .map_err(|err| match err {
                RepoError::InsufficientStock(idx) => {
                    let line = &order.products[idx.min(order.products.len() - 1)];
                    validation_errors(vec![line_error(
                        line.code.clone(),
                        line.name.clone(),
                        "The requested amount exceeds the current stock",
                        None,
                    )])
                }
                other => other.into(),
            })?;

        let confirmed = self.reload(&order_id).await?;
        tracing::info!(code = %confirmed.code, "Order confirmed, stock decremented");

        // Best effort, never part of the transition's atomicity contract
        self.mail.send_order_confirmation(&confirmed);

        Ok(confirmed)
    }

    async fn complete(&self, order: Order, note: Option<String>) -> AppResult<Order> {
        let order_id = order_record_id(&order)?;
        let product_ids: Vec<RecordId> =
            order.products.iter().map(|l| l.product.clone()).collect();

        self.orders
            .complete_recording_transaction(&order_id, product_ids, note)
            .await?;

        let completed = self.reload(&order_id).await?;
        tracing::info!(code = %completed.code, "Order completed, co-purchase recorded");
        Ok(completed)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn reload(&self, id: &RecordId) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::database("Order vanished mid-transition"))
    }

    async fn annotate_live_stock(&self, order: &mut Order) -> AppResult<()> {
        let ids: Vec<RecordId> = order.products.iter().map(|l| l.product.clone()).collect();
        let cards = self.products.find_cards_by_ids(&ids).await?;
        for line in &mut order.products {
            let live = cards
                .iter()
                .find(|card| card.id == line.product)
                .map(|card| card.amount)
                .unwrap_or(0);
            line.amount_in_system = Some(live);
        }
        Ok(())
    }
}

/// Snapshot one cart line against the live catalog, collecting errors
fn check_line(input: &OrderLineInput, card: &ProductCard, lines: &mut Vec<OrderLine>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if input.amount <= 0 {
        errors.push(FieldError::new("amount", "Amount must be positive", input.amount));
    }
    if !card.is_active {
        errors.push(line_error(card.code.clone(), card.name.clone(), "Product is no longer sellable", None));
    }
    if input.amount > card.amount {
        errors.push(line_error(
            card.code.clone(),
            card.name.clone(),
            "The requested amount exceeds the current stock",
            Some(card.amount),
        ));
    }

    if errors.is_empty() {
        lines.push(OrderLine {
            product: card.id.clone(),
            code: card.code.clone(),
            name: card.name.clone(),
            image: card.image.clone(),
            unit: card.unit.clone(),
            price: card.price,
            category: card.category.clone(),
            category_name: card.category_name.clone(),
            amount: input.amount,
            amount_in_system: None,
        });
    }

    errors
}

/// Line-level error payload carrying the product's code and name so the
/// client can point at the offending cart entry
fn line_error(code: String, name: String, msg: &str, amount_in_system: Option<i64>) -> FieldError {
    let mut value = json!({ "code": code, "name": name });
    if let Some(n) = amount_in_system {
        value["amountInSystem"] = json!(n);
    }
    FieldError::new("product", msg, value)
}

fn order_record_id(order: &Order) -> AppResult<RecordId> {
    order
        .id
        .clone()
        .ok_or_else(|| AppError::database("Stored order is missing its id"))
}
