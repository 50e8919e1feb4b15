//! Stock events derived from committed movements.
//!
//! Events are transient: they exist only for the duration of fan-out and carry
//! enough state for an observer to render without a follow-up query.

use serde_json::{Value as JsonValue, json};

use stockline_core::Sku;
use stockline_events::WireEvent;

use crate::product::Product;

/// Domain event published after a committed movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockEvent {
    /// The product's quantity changed.
    StockUpdated { sku: Sku, current_quantity: i64 },
    /// The product is at or below its reorder point.
    LowStockAlert {
        sku: Sku,
        current_quantity: i64,
        reorder_point: i64,
        product_name: String,
    },
}

/// Build the events for a product's post-commit state.
///
/// Always one `StockUpdated`; additionally a `LowStockAlert` iff the product is
/// at or below its reorder point (the same predicate the low-stock query uses).
pub fn stock_events(product: &Product) -> Vec<StockEvent> {
    let mut events = vec![StockEvent::StockUpdated {
        sku: product.sku().clone(),
        current_quantity: product.current_quantity(),
    }];

    if product.is_low_stock() {
        events.push(StockEvent::LowStockAlert {
            sku: product.sku().clone(),
            current_quantity: product.current_quantity(),
            reorder_point: product.reorder_point(),
            product_name: product.name().to_string(),
        });
    }

    events
}

impl WireEvent for StockEvent {
    fn message_type(&self) -> &'static str {
        match self {
            StockEvent::StockUpdated { .. } => "atualizacao_estoque",
            StockEvent::LowStockAlert { .. } => "alerta_estoque_baixo",
        }
    }

    fn to_wire(&self) -> JsonValue {
        match self {
            StockEvent::StockUpdated {
                sku,
                current_quantity,
            } => json!({
                "tipo_msg": self.message_type(),
                "sku": sku,
                "quantidade_atual": current_quantity,
            }),
            StockEvent::LowStockAlert {
                sku,
                current_quantity,
                reorder_point,
                product_name,
            } => json!({
                "tipo_msg": self.message_type(),
                "sku": sku,
                "quantidade_atual": current_quantity,
                "ponto_ressuprimento": reorder_point,
                "mensagem": format!(
                    "ALERTA: Produto {product_name} ({sku}) está com estoque baixo!"
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::NewProduct;

    fn product(quantity: i64, reorder_point: i64) -> Product {
        NewProduct::new("A1".parse().unwrap(), "Widget", "A widget")
            .with_initial_quantity(quantity)
            .with_reorder_point(reorder_point)
            .into_product()
            .unwrap()
    }

    #[test]
    fn always_emits_stock_updated() {
        let events = stock_events(&product(10, 5));
        assert_eq!(
            events,
            vec![StockEvent::StockUpdated {
                sku: "A1".parse().unwrap(),
                current_quantity: 10,
            }]
        );
    }

    #[test]
    fn emits_alert_at_reorder_point_equality() {
        let events = stock_events(&product(5, 5));
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            StockEvent::LowStockAlert {
                current_quantity: 5,
                reorder_point: 5,
                ..
            }
        ));
    }

    #[test]
    fn alert_emission_matches_low_stock_predicate() {
        for quantity in 0..12 {
            let p = product(quantity, 5);
            let has_alert = stock_events(&p)
                .iter()
                .any(|e| matches!(e, StockEvent::LowStockAlert { .. }));
            assert_eq!(has_alert, p.is_low_stock());
        }
    }

    #[test]
    fn stock_updated_wire_shape() {
        let event = StockEvent::StockUpdated {
            sku: "A1".parse().unwrap(),
            current_quantity: 3,
        };
        assert_eq!(
            event.to_wire(),
            serde_json::json!({
                "tipo_msg": "atualizacao_estoque",
                "sku": "A1",
                "quantidade_atual": 3,
            })
        );
    }

    #[test]
    fn low_stock_alert_wire_shape() {
        let event = StockEvent::LowStockAlert {
            sku: "A1".parse().unwrap(),
            current_quantity: 3,
            reorder_point: 5,
            product_name: "Widget".to_string(),
        };
        assert_eq!(
            event.to_wire(),
            serde_json::json!({
                "tipo_msg": "alerta_estoque_baixo",
                "sku": "A1",
                "quantidade_atual": 3,
                "ponto_ressuprimento": 5,
                "mensagem": "ALERTA: Produto Widget (A1) está com estoque baixo!",
            })
        );
    }
}
