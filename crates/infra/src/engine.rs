//! Movement orchestration.
//!
//! [`MovementService::apply`] is the single write path for stock levels:
//! validate, serialize per SKU, apply the pure domain transition, commit
//! atomically, then enqueue the derived events. Events are enqueued while the
//! SKU lock is still held, so for any one SKU the fan-out queue sees them in
//! commit order.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

use stockline_core::{DomainError, Sku};
use stockline_events::EventPublisher;
use stockline_inventory::{MovementRequest, NewMovement, Product, StockEvent, stock_events};

use crate::store::{LedgerStore, StoreError};

/// Failure of a movement attempt. The rejected movement has no effect: no
/// quantity change, no ledger entry, no events.
#[derive(Debug, Error)]
pub enum MovementError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("movement quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("product not found")]
    NotFound,

    #[error("insufficient stock: only {available} available")]
    InsufficientStock { available: i64 },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for MovementError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => MovementError::Validation(message),
            DomainError::InvalidQuantity(quantity) => MovementError::InvalidQuantity(quantity),
            DomainError::NotFound => MovementError::NotFound,
            DomainError::InsufficientStock { available } => {
                MovementError::InsufficientStock { available }
            }
            DomainError::Conflict(message) => MovementError::Conflict(message),
        }
    }
}

impl From<StoreError> for MovementError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => MovementError::Conflict(message),
            other => MovementError::Store(other),
        }
    }
}

/// Serializes and commits stock movements against a [`LedgerStore`].
///
/// Holds one async mutex per SKU so concurrent movements on the same product
/// queue up and each sees the previous one's committed quantity; movements on
/// different SKUs never contend.
pub struct MovementService<S> {
    store: S,
    publisher: EventPublisher<StockEvent>,
    sku_locks: std::sync::Mutex<HashMap<Sku, Arc<AsyncMutex<()>>>>,
}

impl<S> MovementService<S>
where
    S: LedgerStore,
{
    pub fn new(store: S, publisher: EventPublisher<StockEvent>) -> Self {
        Self {
            store,
            publisher,
            sku_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, sku: &Sku) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.sku_locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks
            .entry(sku.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Apply one stock movement end to end.
    ///
    /// On success returns the committed product state together with the events
    /// that were enqueued for fan-out (always a quantity update, plus a
    /// low-stock alert when the product landed at or below its reorder point).
    pub async fn apply(
        &self,
        request: MovementRequest,
    ) -> Result<(Product, Vec<StockEvent>), MovementError> {
        request.validate()?;

        let lock = self.lock_for(&request.sku);
        let _guard = lock.lock().await;

        let current = self
            .store
            .product_by_sku(&request.sku)
            .await?
            .ok_or(MovementError::NotFound)?;

        let updated = current.with_movement(request.direction, request.quantity)?;

        let (committed, movement) = self
            .store
            .record_movement(
                &updated,
                NewMovement {
                    product_sku: request.sku.clone(),
                    direction: request.direction,
                    quantity: request.quantity,
                },
            )
            .await?;

        let events = stock_events(&committed);

        tracing::info!(
            sku = %committed.sku(),
            direction = %movement.direction,
            quantity = movement.quantity,
            current_quantity = committed.current_quantity(),
            movement_id = movement.id,
            low_stock = committed.is_low_stock(),
            "movement committed"
        );

        // Enqueued before the SKU lock is released, so per-SKU queue order
        // matches commit order.
        for event in &events {
            self.publisher.enqueue(event.clone());
        }

        Ok((committed, events))
    }
}
