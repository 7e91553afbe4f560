//! 请求者身份 (外部协作方)
//!
//! JWT 校验由上游网关完成，网关把可信的 `x-user-id` / `x-user-role`
//! 头注入到请求里；本服务只消费这两个头。

mod extractor;

use crate::utils::{AppError, AppResult, ErrorCode};
use surrealdb::RecordId;

/// Gateway-injected header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Gateway-injected header carrying the role ("admin" or "customer")
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated requester, as attested by the upstream gateway
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub is_admin: bool,
}

impl CurrentUser {
    /// The requester's user record id
    pub fn record_id(&self) -> RecordId {
        let key = self
            .user_id
            .strip_prefix("user:")
            .unwrap_or(&self.user_id);
        RecordId::from_table_key("user", key)
    }

    /// Admin-only routes call this before touching anything
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }

    /// Whether this requester may see/touch the given order owner
    pub fn owns_or_admin(&self, owner: &RecordId) -> bool {
        self.is_admin || self.record_id() == *owner
    }
}
