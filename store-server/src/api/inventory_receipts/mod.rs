//! Inventory Receipt API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory-receipts", receipt_routes())
}

fn receipt_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/new-code", get(handler::new_code))
        .route("/{id}", get(handler::get_by_id))
}
