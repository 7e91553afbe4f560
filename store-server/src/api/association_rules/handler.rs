//! Association Rule API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AssociationRuleFull, ProductCard};
use crate::db::repository::parse_record_id;
use crate::recommend::{SUGGESTION_LIMIT, SuggestionEngine};
use crate::utils::AppResult;

/// GET /api/association-rules - 规则列表 (管理端看板)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<AssociationRuleFull>>> {
    user.require_admin()?;
    let rules = SuggestionEngine::new(state.db.clone()).list_rules().await?;
    Ok(Json(rules))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    /// Semicolon-joined seed product ids; absent or empty means cold start
    #[serde(default)]
    pub ids: Option<String>,
}

/// GET /api/association-rules/suggestion?ids=a;b;c - 推荐商品
///
/// 无需登录，浏览页直接调用。
pub async fn suggestion(
    State(state): State<ServerState>,
    Query(params): Query<SuggestionParams>,
) -> AppResult<Json<Vec<ProductCard>>> {
    let seeds: Vec<RecordId> = params
        .ids
        .as_deref()
        .unwrap_or("")
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_record_id("product", part.trim()))
        .collect();

    let products = SuggestionEngine::new(state.db.clone())
        .suggest(&seeds, SUGGESTION_LIMIT)
        .await?;
    Ok(Json(products))
}
