//! Application wiring: store selection, fan-out task, and the Axum router.

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use stockline_events::{EventPublisher, ObserverRegistry};
use stockline_infra::{InMemoryLedgerStore, LedgerStore, MovementService, SqliteLedgerStore};

use crate::routes;

/// Shared per-request state, injected as an [`Extension`].
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub movements: Arc<MovementService<Arc<dyn LedgerStore>>>,
    pub registry: Arc<ObserverRegistry>,
}

/// Build the full application (public entrypoint used by `main.rs`).
///
/// `DATABASE_URL` selects the sqlite backend (e.g.
/// `sqlite://stockline.db?mode=rwc`); without it the service runs on the
/// in-memory store and loses everything on restart.
pub async fn build_app() -> Router {
    let store: Arc<dyn LedgerStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => Arc::new(
            SqliteLedgerStore::connect(&url)
                .await
                .expect("failed to open database"),
        ),
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using volatile in-memory store");
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    build_app_with_store(store)
}

/// Wire the router around an already-constructed store. Used directly by the
/// black-box API tests.
pub fn build_app_with_store(store: Arc<dyn LedgerStore>) -> Router {
    build_app_with_state(app_state(store))
}

/// Construct the shared services around a store: registry, fan-out task, and
/// movement engine.
pub fn app_state(store: Arc<dyn LedgerStore>) -> AppState {
    let registry = Arc::new(ObserverRegistry::new());
    let publisher = EventPublisher::spawn(registry.clone());
    let movements = Arc::new(MovementService::new(store.clone(), publisher));

    AppState {
        store,
        movements,
        registry,
    }
}

pub fn build_app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .merge(routes::router())
        .layer(Extension(state))
}
