//! WebSocket endpoint and client script for live reload.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::header;
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use super::manager::ReloadEvent;
use crate::state::AppState;

/// Client script, served at [`super::CLIENT_SCRIPT_PATH`].
const CLIENT_SCRIPT: &str = include_str!("../../assets/live-reload.js");

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let Some(ref live_reload) = state.live_reload else {
        return;
    };

    let mut receiver: broadcast::Receiver<ReloadEvent> = live_reload.subscribe();
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = receiver.recv() => {
                match result {
                    Ok(event) => {
                        let msg = match serde_json::to_string(&event) {
                            Ok(msg) => msg,
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to encode reload event");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    // A missed event still means "something changed"
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Live reload client lagged");
                    }
                }
            }
            // Client messages are keepalives only
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve the browser-side live reload client.
pub(crate) async fn client_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        CLIENT_SCRIPT,
    )
}
