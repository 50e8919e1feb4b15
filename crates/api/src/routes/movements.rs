use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;

use stockline_core::Sku;
use stockline_inventory::{Direction, MovementRequest};

use crate::app::AppState;
use crate::routes::errors;

pub fn router() -> Router {
    Router::new().route("/movements", post(apply_movement))
}

#[derive(Debug, Deserialize)]
pub struct ApplyMovementRequest {
    pub sku: String,
    pub direction: Direction,
    pub quantity: i64,
}

/// POST /movements
///
/// Applies one stock movement and answers with the committed product state.
/// Rejections leave the product untouched and map onto the error taxonomy
/// (400 invalid input, 404 unknown SKU, 409 insufficient stock).
pub async fn apply_movement(
    Extension(state): Extension<AppState>,
    Json(body): Json<ApplyMovementRequest>,
) -> axum::response::Response {
    let sku: Sku = match body.sku.parse() {
        Ok(sku) => sku,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
        }
    };

    let request = MovementRequest {
        sku,
        direction: body.direction,
        quantity: body.quantity,
    };

    match state.movements.apply(request).await {
        Ok((product, _events)) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::movement_error_to_response(e),
    }
}
