use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult, Sku};

use crate::movement::Direction;

/// Reorder point assigned when a product is created without one.
pub const DEFAULT_REORDER_POINT: i64 = 5;

/// A tracked product and its current stock level.
///
/// Invariant: `current_quantity >= 0`, always. The quantity is mutated only
/// through [`Product::with_movement`], which enforces the invariant; everything
/// else reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    sku: Sku,
    name: String,
    description: String,
    current_quantity: i64,
    reorder_point: i64,
}

impl Product {
    /// Rebuild a product from trusted storage fields.
    ///
    /// Callers (ledger store implementations) assert the stored row already
    /// satisfies the domain invariants.
    pub fn from_parts(
        sku: Sku,
        name: String,
        description: String,
        current_quantity: i64,
        reorder_point: i64,
    ) -> Self {
        Self {
            sku,
            name,
            description,
            current_quantity,
            reorder_point,
        }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn current_quantity(&self) -> i64 {
        self.current_quantity
    }

    pub fn reorder_point(&self) -> i64 {
        self.reorder_point
    }

    /// Low-stock predicate: at or below the reorder point counts as low.
    ///
    /// This is the single definition used both by the low-stock query and by
    /// the movement engine when deciding whether to emit a low-stock alert.
    pub fn is_low_stock(&self) -> bool {
        self.current_quantity <= self.reorder_point
    }

    /// Apply a movement to this product, returning the updated product.
    ///
    /// Pure: `self` is untouched. An outbound movement larger than the current
    /// quantity is rejected with `InsufficientStock` and reports the quantity
    /// that was available, so no partial debit can ever be observed. An inbound
    /// movement that would overflow the stock level is rejected as validation
    /// failure before anything is committed.
    pub fn with_movement(&self, direction: Direction, quantity: i64) -> DomainResult<Product> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(quantity));
        }

        let current_quantity = match direction {
            Direction::Inbound => self
                .current_quantity
                .checked_add(quantity)
                .ok_or_else(|| DomainError::validation("movement would overflow stock level"))?,
            Direction::Outbound => {
                if quantity > self.current_quantity {
                    return Err(DomainError::insufficient_stock(self.current_quantity));
                }
                self.current_quantity - quantity
            }
        };

        Ok(Product {
            current_quantity,
            ..self.clone()
        })
    }
}

/// Input shape for product creation; validated into a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub sku: Sku,
    pub name: String,
    pub description: String,
    pub current_quantity: i64,
    pub reorder_point: i64,
}

impl NewProduct {
    pub fn new(sku: Sku, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            sku,
            name: name.into(),
            description: description.into(),
            current_quantity: 0,
            reorder_point: DEFAULT_REORDER_POINT,
        }
    }

    pub fn with_initial_quantity(mut self, quantity: i64) -> Self {
        self.current_quantity = quantity;
        self
    }

    pub fn with_reorder_point(mut self, reorder_point: i64) -> Self {
        self.reorder_point = reorder_point;
        self
    }

    /// Validate and build the product.
    pub fn into_product(self) -> DomainResult<Product> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.current_quantity < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }
        if self.reorder_point < 0 {
            return Err(DomainError::validation("reorder point cannot be negative"));
        }

        Ok(Product {
            sku: self.sku,
            name: self.name,
            description: self.description,
            current_quantity: self.current_quantity,
            reorder_point: self.reorder_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64, reorder_point: i64) -> Product {
        NewProduct::new("A1".parse().unwrap(), "Widget", "A widget")
            .with_initial_quantity(quantity)
            .with_reorder_point(reorder_point)
            .into_product()
            .unwrap()
    }

    #[test]
    fn inbound_increases_by_exactly_q() {
        let p = product(10, 5);
        let updated = p.with_movement(Direction::Inbound, 4).unwrap();
        assert_eq!(updated.current_quantity(), 14);
        assert_eq!(p.current_quantity(), 10);
    }

    #[test]
    fn outbound_decreases_by_exactly_q() {
        let p = product(10, 5);
        let updated = p.with_movement(Direction::Outbound, 7).unwrap();
        assert_eq!(updated.current_quantity(), 3);
    }

    #[test]
    fn outbound_exceeding_stock_is_rejected_and_reports_available() {
        let p = product(3, 5);
        let err = p.with_movement(Direction::Outbound, 10).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(3));
        assert_eq!(p.current_quantity(), 3);
    }

    #[test]
    fn outbound_of_exact_stock_drains_to_zero() {
        let p = product(5, 5);
        let updated = p.with_movement(Direction::Outbound, 5).unwrap();
        assert_eq!(updated.current_quantity(), 0);
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        let p = product(10, 5);
        assert_eq!(
            p.with_movement(Direction::Inbound, 0).unwrap_err(),
            DomainError::invalid_quantity(0)
        );
        assert_eq!(
            p.with_movement(Direction::Outbound, -3).unwrap_err(),
            DomainError::invalid_quantity(-3)
        );
    }

    #[test]
    fn inbound_overflowing_stock_level_is_rejected() {
        let p = product(1, 5);
        let err = p.with_movement(Direction::Inbound, i64::MAX).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(p.current_quantity(), 1);

        // Landing exactly on i64::MAX is still a valid stock level.
        let p = product(1, 5);
        let updated = p.with_movement(Direction::Inbound, i64::MAX - 1).unwrap();
        assert_eq!(updated.current_quantity(), i64::MAX);
    }

    #[test]
    fn low_stock_counts_equality() {
        assert!(product(5, 5).is_low_stock());
        assert!(product(3, 5).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
    }

    #[test]
    fn new_product_defaults() {
        let p = NewProduct::new("B2".parse().unwrap(), "Bolt", "")
            .into_product()
            .unwrap();
        assert_eq!(p.current_quantity(), 0);
        assert_eq!(p.reorder_point(), DEFAULT_REORDER_POINT);
    }

    #[test]
    fn new_product_rejects_empty_name() {
        let err = NewProduct::new("B2".parse().unwrap(), "   ", "")
            .into_product()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_product_rejects_negative_quantities() {
        let err = NewProduct::new("B2".parse().unwrap(), "Bolt", "")
            .with_initial_quantity(-1)
            .into_product()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = NewProduct::new("B2".parse().unwrap(), "Bolt", "")
            .with_reorder_point(-1)
            .into_product()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: quantity never goes negative through any accepted movement.
            #[test]
            fn quantity_never_negative(
                initial in 0i64..10_000,
                quantity in 1i64..10_000,
                outbound in proptest::bool::ANY,
            ) {
                let p = product(initial, 5);
                let direction = if outbound { Direction::Outbound } else { Direction::Inbound };
                match p.with_movement(direction, quantity) {
                    Ok(updated) => prop_assert!(updated.current_quantity() >= 0),
                    Err(err) => {
                        prop_assert_eq!(err, DomainError::insufficient_stock(initial));
                        prop_assert!(outbound && quantity > initial);
                    }
                }
            }

            /// Property: inbound then equal outbound is an exact round trip.
            #[test]
            fn inbound_then_outbound_round_trips(
                initial in 0i64..10_000,
                quantity in 1i64..10_000,
            ) {
                let p = product(initial, 5);
                let after = p
                    .with_movement(Direction::Inbound, quantity)
                    .unwrap()
                    .with_movement(Direction::Outbound, quantity)
                    .unwrap();
                prop_assert_eq!(after.current_quantity(), initial);
            }

            /// Property: the low-stock predicate is exactly `quantity <= reorder_point`.
            #[test]
            fn low_stock_predicate_matches_definition(
                quantity in 0i64..100,
                reorder_point in 0i64..100,
            ) {
                let p = product(quantity, reorder_point);
                prop_assert_eq!(p.is_low_stock(), quantity <= reorder_point);
            }
        }
    }
}
