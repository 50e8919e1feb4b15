//! `stockline-inventory` — inventory domain model.
//!
//! Pure domain logic: products, movements, and the stock events derived from
//! committed movements. No storage or transport concerns live here.

pub mod event;
pub mod movement;
pub mod product;

pub use event::{StockEvent, stock_events};
pub use movement::{Direction, Movement, MovementRequest, NewMovement};
pub use product::{DEFAULT_REORDER_POINT, NewProduct, Product};
