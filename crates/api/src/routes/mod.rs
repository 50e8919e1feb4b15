use axum::Router;

pub mod errors;
pub mod movements;
pub mod products;
pub mod stream;

/// Router for everything except `/health` (which `app.rs` mounts itself).
pub fn router() -> Router {
    Router::new()
        .merge(products::router())
        .merge(movements::router())
        .merge(stream::router())
}

pub async fn health() -> &'static str {
    "ok"
}
