use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use stockline_core::Sku;
use stockline_inventory::{Movement, NewMovement, Product};

use super::{LedgerStore, StoreError};

/// Durable ledger store on sqlite (sqlx).
///
/// Two tables: `products` keyed by SKU, and the append-only `movements` ledger
/// with an indexed foreign key back to the product. Movement ids come from the
/// rowid sequence; timestamps are bumped in-process so they stay strictly
/// monotonic even when the wall clock does not advance between appends.
#[derive(Debug)]
pub struct SqliteLedgerStore {
    pool: SqlitePool,
    last_occurred_at: Mutex<Option<DateTime<Utc>>>,
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let sku: String = row.try_get("sku").map_err(backend)?;
    let sku: Sku = sku
        .parse()
        .map_err(|e| StoreError::Backend(format!("stored SKU is invalid: {e}")))?;

    Ok(Product::from_parts(
        sku,
        row.try_get("name").map_err(backend)?,
        row.try_get("description").map_err(backend)?,
        row.try_get("current_quantity").map_err(backend)?,
        row.try_get("reorder_point").map_err(backend)?,
    ))
}

impl SqliteLedgerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            last_occurred_at: Mutex::new(None),
        }
    }

    /// Open (or create) the database at `url` and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new().connect(url).await.map_err(backend)?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Idempotent schema creation.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                sku TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                current_quantity INTEGER NOT NULL CHECK (current_quantity >= 0),
                reorder_point INTEGER NOT NULL DEFAULT 5
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS movements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_sku TEXT NOT NULL REFERENCES products (sku),
                direction TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                occurred_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_movements_product_sku ON movements (product_sku)")
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(())
    }

    fn next_occurred_at(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let mut last = match self.last_occurred_at.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let assigned = match *last {
            Some(previous) if now <= previous => previous + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(assigned);
        assigned
    }
}

#[async_trait::async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn create_product(&self, product: Product) -> Result<Product, StoreError> {
        let result = sqlx::query(
            "INSERT INTO products (sku, name, description, current_quantity, reorder_point)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(product.sku().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.current_quantity())
        .bind(product.reorder_point())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(product),
            Err(err)
                if err
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation()) =>
            {
                Err(StoreError::Conflict(format!(
                    "product with SKU '{}' already exists",
                    product.sku()
                )))
            }
            Err(err) => Err(backend(err)),
        }
    }

    async fn product_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            "SELECT sku, name, description, current_quantity, reorder_point
             FROM products WHERE sku = ?1",
        )
        .bind(sku.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT sku, name, description, current_quantity, reorder_point FROM products",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError> {
        // Same predicate as Product::is_low_stock, expressed in SQL.
        let rows = sqlx::query(
            "SELECT sku, name, description, current_quantity, reorder_point
             FROM products WHERE current_quantity <= reorder_point",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn record_movement(
        &self,
        product: &Product,
        movement: NewMovement,
    ) -> Result<(Product, Movement), StoreError> {
        let occurred_at = self.next_occurred_at();

        let mut tx = self.pool.begin().await.map_err(backend)?;

        let updated = sqlx::query("UPDATE products SET current_quantity = ?1 WHERE sku = ?2")
            .bind(product.current_quantity())
            .bind(product.sku().as_str())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        if updated.rows_affected() != 1 {
            return Err(StoreError::Backend(format!(
                "movement for unknown product '{}'",
                product.sku()
            )));
        }

        let inserted = sqlx::query(
            "INSERT INTO movements (product_sku, direction, quantity, occurred_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(movement.product_sku.as_str())
        .bind(movement.direction.as_str())
        .bind(movement.quantity)
        .bind(occurred_at)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

        let recorded = Movement {
            id: inserted.last_insert_rowid(),
            product_sku: movement.product_sku,
            direction: movement.direction,
            quantity: movement.quantity,
            occurred_at,
        };

        Ok((product.clone(), recorded))
    }
}
