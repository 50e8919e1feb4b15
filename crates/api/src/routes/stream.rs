//! WebSocket endpoint for real-time stock events.
//!
//! Each connection becomes one observer in the registry. The socket is
//! write-mostly: serialized events flow out, inbound frames are drained and
//! ignored so pings and client chatter do not stall the connection.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Extension, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use tokio::sync::mpsc;

use stockline_events::ObserverRegistry;

use crate::app::AppState;

pub fn router() -> Router {
    Router::new().route("/ws", get(stream))
}

pub async fn stream(
    Extension(state): Extension<AppState>,
    ws: WebSocketUpgrade,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry))
        .into_response()
}

async fn handle_socket(mut socket: WebSocket, registry: Arc<ObserverRegistry>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let id = registry.subscribe(Arc::new(tx));
    tracing::debug!(observer = %id, observers = registry.len(), "observer connected");

    loop {
        tokio::select! {
            payload = rx.recv() => match payload {
                Some(payload) => {
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                // Registry dropped our sender (failed delivery elsewhere).
                None => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    registry.unsubscribe(id);
    tracing::debug!(observer = %id, observers = registry.len(), "observer disconnected");
}
