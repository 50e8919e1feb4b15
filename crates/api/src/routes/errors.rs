//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockline_infra::{MovementError, StoreError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn movement_error_to_response(err: MovementError) -> axum::response::Response {
    match err {
        MovementError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        MovementError::InvalidQuantity(_) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_quantity",
            err.to_string(),
        ),
        MovementError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        MovementError::InsufficientStock { .. } => json_error(
            StatusCode::CONFLICT,
            "insufficient_stock",
            err.to_string(),
        ),
        MovementError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        MovementError::Store(e) => {
            tracing::error!(error = %e, "storage failure during movement");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "storage failure",
            )
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Backend(e) => {
            tracing::error!(error = %e, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "storage failure",
            )
        }
    }
}
