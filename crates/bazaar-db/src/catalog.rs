//! # Product Repository and Catalog
//!
//! Database operations for the cached product catalog, and the
//! [`ProductCatalog`] implementation the cart-view hydration uses.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use async_trait::async_trait;
use bazaar_core::ProductSummary;
use bazaar_store::{ProductCatalog, StoreError, StoreResult};

use crate::error::DbResult;
use crate::pool::Database;

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// repo.upsert(&product).await?;
/// let product = repo.get_by_id("prod-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Fetches a product by catalog id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductSummary>> {
        let product = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT id, name, price_cents, unit, image_url, in_stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(id = %id, found = product.is_some(), "product get_by_id");
        Ok(product)
    }

    /// Inserts or replaces a product record.
    ///
    /// Called when a catalog sync lands a fresh page of products.
    pub async fn upsert(&self, product: &ProductSummary) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, unit, image_url, in_stock, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price_cents = excluded.price_cents,
                unit = excluded.unit,
                image_url = excluded.image_url,
                in_stock = excluded.in_stock,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.unit)
        .bind(&product.image_url)
        .bind(product.in_stock)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(id = %product.id, "product upserted");
        Ok(())
    }

    /// Lists in-stock products, sorted by name.
    pub async fn list_in_stock(&self, limit: u32) -> DbResult<Vec<ProductSummary>> {
        let products = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT id, name, price_cents, unit, image_url, in_stock
            FROM products
            WHERE in_stock = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "listed in-stock products");
        Ok(products)
    }
}

// =============================================================================
// Catalog Adapter
// =============================================================================

/// [`ProductCatalog`] backed by the `products` table.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    db: Database,
}

impl SqliteCatalog {
    /// Creates a catalog over an open database.
    pub fn new(db: Database) -> Self {
        SqliteCatalog { db }
    }
}

#[async_trait]
impl ProductCatalog for SqliteCatalog {
    async fn get_by_id(&self, product_id: &str) -> StoreResult<Option<ProductSummary>> {
        self.db
            .products()
            .get_by_id(product_id)
            .await
            .map_err(StoreError::backend)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
