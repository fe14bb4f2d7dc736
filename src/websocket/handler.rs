use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::websocket::session::Session;
use crate::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Outgoing frames are queued so room locks never wait on the network
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let mut session = Session::new(Arc::clone(&state.registry), state.turn_advance_delay, tx);
    let connection_id = session.id();
    tracing::info!("Connection {} opened", connection_id);

    // Spawn task for sending outgoing messages
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                session.handle_text(text.as_str()).await;
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Connection {} sent close frame", connection_id);
                break;
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!("Connection {} sent binary frame (ignored)", connection_id);
            }
            Ok(_) => {
                // Ping/pong is answered by axum
            }
            Err(e) => {
                tracing::warn!("WebSocket error for connection {}: {}", connection_id, e);
                break;
            }
        }
    }

    session.close().await;
    send_task.abort();
    tracing::info!("Connection {} closed", connection_id);
}
