//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderUpdate};
use crate::db::repository::parse_record_id;
use crate::orders::OrderService;
use crate::utils::AppResult;

fn service(state: &ServerState) -> OrderService {
    OrderService::new(state.db.clone(), state.mail.clone())
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<impl IntoResponse> {
    let order = service(&state).create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - 订单列表 (管理员看全部，顾客看自己的)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = service(&state).list(&user).await?;
    Ok(Json(orders))
}

/// GET /api/orders/new-code - 下一个订单编号预览
pub async fn new_code(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<String>> {
    user.require_admin()?;
    let code = service(&state).next_code().await?;
    Ok(Json(code))
}

/// GET /api/orders/:id - 获取单个订单 (Pending 时附带实时库存)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let id = parse_record_id("order", &id);
    let order = service(&state).get(&user, &id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id - 状态流转 (仅管理员)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    user.require_admin()?;
    let id = parse_record_id("order", &id);
    let order = service(&state).transition(&id, payload).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 取消/删除订单
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let id = parse_record_id("order", &id);
    let order = service(&state).delete(&user, &id).await?;
    Ok(Json(order))
}
