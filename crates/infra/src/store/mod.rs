//! Ledger storage seam.
//!
//! Durable keyed storage for products plus the append-only movement ledger.
//! Implementations must make `record_movement` atomic: the product upsert and
//! the movement append commit together or not at all.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockline_core::Sku;
use stockline_inventory::{Movement, NewMovement, Product};

mod in_memory;
mod sqlite;

pub use in_memory::InMemoryLedgerStore;
pub use sqlite::SqliteLedgerStore;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation (duplicate SKU).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything else the backend can fail with.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Keyed product storage + append-only movement ledger.
///
/// Implementations must:
/// - reject duplicate SKUs on `create_product` with [`StoreError::Conflict`],
///   leaving the existing product untouched
/// - persist product upsert and movement append atomically in
///   `record_movement`, assigning the movement id and a per-store monotonic
///   `occurred_at`
/// - answer `list_low_stock` with exactly the products where
///   `current_quantity <= reorder_point`
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist a new product; duplicate SKU is a conflict.
    async fn create_product(&self, product: Product) -> Result<Product, StoreError>;

    /// Look up one product by its SKU.
    async fn product_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError>;

    /// Full product snapshot; ordering is not meaningful.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Products at or below their reorder point.
    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError>;

    /// Atomically persist the updated product and append the movement record.
    async fn record_movement(
        &self,
        product: &Product,
        movement: NewMovement,
    ) -> Result<(Product, Movement), StoreError>;
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn create_product(&self, product: Product) -> Result<Product, StoreError> {
        (**self).create_product(product).await
    }

    async fn product_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        (**self).product_by_sku(sku).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_products().await
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_low_stock().await
    }

    async fn record_movement(
        &self,
        product: &Product,
        movement: NewMovement,
    ) -> Result<(Product, Movement), StoreError> {
        (**self).record_movement(product, movement).await
    }
}
