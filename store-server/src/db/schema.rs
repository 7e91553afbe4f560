//! Table and index definitions
//!
//! Applied at startup; every statement uses IF NOT EXISTS so restarts are
//! harmless. Tables stay SCHEMALESS; the models are the source of truth
//! for shape, the database only enforces the uniqueness constraints the
//! code generation relies on.

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const DEFINITIONS: &str = r#"
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE INDEX IF NOT EXISTS product_code ON product FIELDS code UNIQUE;

DEFINE TABLE IF NOT EXISTS category SCHEMALESS;

DEFINE TABLE IF NOT EXISTS user SCHEMALESS;

DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_code ON order FIELDS code UNIQUE;
DEFINE INDEX IF NOT EXISTS order_status ON order FIELDS status;

DEFINE TABLE IF NOT EXISTS inventory_receipt SCHEMALESS;
DEFINE INDEX IF NOT EXISTS inventory_receipt_code ON inventory_receipt FIELDS code UNIQUE;

DEFINE TABLE IF NOT EXISTS inventory_receipt_detail SCHEMALESS;
DEFINE INDEX IF NOT EXISTS receipt_detail_receipt ON inventory_receipt_detail FIELDS receipt;

DEFINE TABLE IF NOT EXISTS transaction SCHEMALESS;

DEFINE TABLE IF NOT EXISTS association_rule SCHEMALESS;

DEFINE TABLE IF NOT EXISTS sequence SCHEMALESS;
"#;

/// Apply all table/index definitions
pub async fn define(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(DEFINITIONS)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
    Ok(())
}
