//! Sequence Repository
//!
//! Human-readable codes (O.0001, I.0001, ...) come from a dedicated
//! per-prefix counter record instead of a "max existing code + 1" scan,
//! which is racy under concurrent creation. The increment is a single
//! UPSERT statement, so the database serializes it; gaps are tolerated.

use super::{BaseRepository, RepoError, RepoResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Sequence names, doubling as record keys in the `sequence` table
pub const ORDER_SEQUENCE: &str = "order";
pub const RECEIPT_SEQUENCE: &str = "inventory_receipt";

#[derive(Clone)]
pub struct SequenceRepository {
    base: BaseRepository,
}

impl SequenceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically take the next value of the named sequence (starts at 1)
    pub async fn next(&self, name: &str) -> RepoResult<i64> {
        let value: Option<i64> = self
            .base
            .db()
            .query(
                "UPSERT ONLY type::thing('sequence', $name) \
                 SET value = (value ?? 0) + 1 RETURN VALUE value",
            )
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        value.ok_or_else(|| RepoError::Database(format!("Sequence {} returned no value", name)))
    }

    /// Read the next value without consuming it (for new-code previews)
    pub async fn peek(&self, name: &str) -> RepoResult<i64> {
        let value: Option<i64> = self
            .base
            .db()
            .query("SELECT VALUE value FROM ONLY type::thing('sequence', $name)")
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        Ok(value.unwrap_or(0) + 1)
    }
}

/// Render a sequence value as a display code: prefix, dot, zero-padded to
/// four digits (grows past 9999 without truncation)
pub fn format_code(prefix: char, value: i64) -> String {
    format!("{prefix}.{value:04}")
}
