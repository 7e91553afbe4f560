//! Association Rule API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/association-rules", rule_routes())
}

fn rule_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/suggestion", get(handler::suggestion))
}
