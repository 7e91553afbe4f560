//! Inventory Receipt API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{InventoryReceipt, InventoryReceiptCreate, InventoryReceiptFull};
use crate::db::repository::parse_record_id;
use crate::inventory::InventoryLedger;
use crate::utils::AppResult;

fn ledger(state: &ServerState) -> InventoryLedger {
    InventoryLedger::new(state.db.clone())
}

/// POST /api/inventory-receipts - 入库 (仅管理员)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<InventoryReceiptCreate>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let receipt = ledger(&state).receive_stock(user.record_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/inventory-receipts - 入库单列表 (仅管理员)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<InventoryReceipt>>> {
    user.require_admin()?;
    let receipts = ledger(&state).list_receipts().await?;
    Ok(Json(receipts))
}

/// GET /api/inventory-receipts/new-code - 下一个入库单编号预览
pub async fn new_code(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<String>> {
    user.require_admin()?;
    let code = ledger(&state).next_code().await?;
    Ok(Json(code))
}

/// GET /api/inventory-receipts/:id - 获取入库单明细 (仅管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<InventoryReceiptFull>> {
    user.require_admin()?;
    let id = parse_record_id("inventory_receipt", &id);
    let receipt = ledger(&state).get_receipt(&id).await?;
    Ok(Json(receipt))
}
