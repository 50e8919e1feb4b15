use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use stockline_core::Sku;
use stockline_inventory::{Movement, NewMovement, Product};

use super::{LedgerStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<Sku, Product>,
    movements: Vec<Movement>,
    last_occurred_at: Option<DateTime<Utc>>,
}

impl Inner {
    /// Per-store monotonic timestamp: never at or before the previous one,
    /// even when the wall clock does not advance between appends.
    fn next_occurred_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let assigned = match self.last_occurred_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_occurred_at = Some(assigned);
        assigned
    }
}

/// In-memory ledger store.
///
/// Intended for tests/dev. Atomicity of `record_movement` falls out of the
/// single mutex: both writes happen inside one critical section.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: Mutex<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger snapshot for a single product, in append order. Test/debug aid.
    pub fn movements_for(&self, sku: &Sku) -> Vec<Movement> {
        self.inner
            .lock()
            .map(|inner| {
                inner
                    .movements
                    .iter()
                    .filter(|m| &m.product_sku == sku)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create_product(&self, product: Product) -> Result<Product, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| lock_poisoned())?;

        if inner.products.contains_key(product.sku()) {
            return Err(StoreError::Conflict(format!(
                "product with SKU '{}' already exists",
                product.sku()
            )));
        }

        inner.products.insert(product.sku().clone(), product.clone());
        Ok(product)
    }

    async fn product_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        Ok(inner.products.get(sku).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        Ok(inner.products.values().cloned().collect())
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        Ok(inner
            .products
            .values()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect())
    }

    async fn record_movement(
        &self,
        product: &Product,
        movement: NewMovement,
    ) -> Result<(Product, Movement), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| lock_poisoned())?;

        if !inner.products.contains_key(product.sku()) {
            return Err(StoreError::Backend(format!(
                "movement for unknown product '{}'",
                product.sku()
            )));
        }

        let occurred_at = inner.next_occurred_at();
        let recorded = Movement {
            id: inner.movements.len() as i64 + 1,
            product_sku: movement.product_sku,
            direction: movement.direction,
            quantity: movement.quantity,
            occurred_at,
        };

        inner.products.insert(product.sku().clone(), product.clone());
        inner.movements.push(recorded.clone());

        Ok((product.clone(), recorded))
    }
}
