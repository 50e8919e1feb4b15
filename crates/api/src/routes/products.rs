use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use stockline_core::Sku;
use stockline_inventory::{DEFAULT_REORDER_POINT, NewProduct};

use crate::app::AppState;
use crate::routes::errors;

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/low-stock", get(list_low_stock))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_quantity: i64,
    #[serde(default = "default_reorder_point")]
    pub reorder_point: i64,
}

fn default_reorder_point() -> i64 {
    DEFAULT_REORDER_POINT
}

pub async fn create_product(
    Extension(state): Extension<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> axum::response::Response {
    let sku: Sku = match body.sku.parse() {
        Ok(sku) => sku,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
        }
    };

    let product = match NewProduct::new(sku, body.name, body.description)
        .with_initial_quantity(body.current_quantity)
        .with_reorder_point(body.reorder_point)
        .into_product()
    {
        Ok(product) => product,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
        }
    };

    match state.store.create_product(product).await {
        Ok(created) => {
            tracing::info!(sku = %created.sku(), "product created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_products(Extension(state): Extension<AppState>) -> axum::response::Response {
    match state.store.list_products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_low_stock(Extension(state): Extension<AppState>) -> axum::response::Response {
    match state.store.list_low_stock().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
