//! Repository Module
//!
//! Typed query methods over SurrealDB tables. Handlers and services never
//! build query strings themselves; storage-specific construction stays
//! behind these names.

pub mod association_rule;
pub mod inventory_receipt;
pub mod order;
pub mod product;
pub mod sequence;
pub mod transaction;

// Re-exports
pub use association_rule::AssociationRuleRepository;
pub use inventory_receipt::{InventoryReceiptRepository, ReceiptLine};
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use sequence::SequenceRepository;
pub use transaction::TransactionRepository;

use crate::utils::AppError;
use shared::ErrorCode;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A guarded status flip matched zero rows: the order moved under us
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// A conditional decrement matched zero rows: stock ran out between
    /// validation and commit
    #[error("Insufficient stock for line {0}")]
    InsufficientStock(usize),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::StateConflict(msg) => {
                AppError::with_message(ErrorCode::OrderStateConflict, msg)
            }
            RepoError::InsufficientStock(_) => AppError::new(ErrorCode::ProductOutOfStock),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "product:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("product", "abc");
//   - API 输入同时接受 "table:id" 和裸 key，见 parse_record_id

/// Parse an id supplied by a client: either "table:key" or a bare key
pub fn parse_record_id(table: &str, raw: &str) -> RecordId {
    match raw.split_once(':') {
        Some((t, key)) if t == table => RecordId::from_table_key(table, key),
        _ => RecordId::from_table_key(table, raw),
    }
}

/// Extract the index from a `MARKER:<idx>` string thrown inside a
/// database transaction
pub(crate) fn thrown_index(message: &str, marker: &str) -> Option<usize> {
    let rest = message.split(marker).nth(1)?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Whether a thrown marker appears in a database error message
pub(crate) fn was_thrown(message: &str, marker: &str) -> bool {
    message.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_bare_ids() {
        let full = parse_record_id("product", "product:abc");
        let bare = parse_record_id("product", "abc");
        assert_eq!(full, bare);
        assert_eq!(full.to_string(), "product:abc");
    }

    #[test]
    fn extracts_thrown_index() {
        let msg = "An error occurred: OUT_OF_STOCK:2";
        assert_eq!(thrown_index(msg, "OUT_OF_STOCK:"), Some(2));
        assert_eq!(thrown_index("no marker here", "OUT_OF_STOCK:"), None);
    }
}
