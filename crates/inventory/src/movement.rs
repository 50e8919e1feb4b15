use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult, Sku};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Direction::Inbound),
            "outbound" => Ok(Direction::Outbound),
            other => Err(DomainError::validation(format!(
                "direction must be 'inbound' or 'outbound', got '{other}'"
            ))),
        }
    }
}

/// A committed ledger entry: one recorded change to a product's quantity.
///
/// Immutable once created; the store assigns `id` and `occurred_at` (monotonic
/// per store) at append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub product_sku: Sku,
    pub direction: Direction,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// A movement ready to be appended (no id or timestamp yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    pub product_sku: Sku,
    pub direction: Direction,
    pub quantity: i64,
}

/// External input for a movement; validated before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRequest {
    pub sku: Sku,
    pub direction: Direction,
    pub quantity: i64,
}

impl MovementRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::invalid_quantity(self.quantity));
        }
        Ok(())
    }
}
