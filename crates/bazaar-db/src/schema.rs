//! # Schema Setup
//!
//! Idempotent schema creation for the on-device database.
//!
//! Two tables carry everything this layer stores:
//!
//! ```text
//! kv_entries                      products
//! ──────────                      ────────
//! key         TEXT PK             id           TEXT PK
//! value       TEXT                name         TEXT
//! updated_at  TEXT                price_cents  INTEGER
//!                                 unit         TEXT
//!                                 image_url    TEXT NULL
//!                                 in_stock     INTEGER (bool)
//!                                 updated_at   TEXT
//! ```
//!
//! Every statement is `IF NOT EXISTS`, so setup is safe to run on every
//! connect.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

/// Schema statements, applied in order.
const SCHEMA_SQL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS kv_entries (
        key        TEXT PRIMARY KEY,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        price_cents INTEGER NOT NULL,
        unit        TEXT NOT NULL,
        image_url   TEXT,
        in_stock    INTEGER NOT NULL DEFAULT 1,
        updated_at  TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_in_stock ON products(in_stock)",
];

/// Applies the schema to a fresh or existing database.
pub async fn apply_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Applying database schema");

    for statement in SCHEMA_SQL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DbError::SetupFailed(e.to_string()))?;
    }

    info!("Schema ready");
    Ok(())
}
