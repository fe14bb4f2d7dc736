//! Per-connection state machine
//!
//! `Connected` -> `JoinPending` -> `InRoom` -> `Closed`. Every inbound frame
//! goes through [`Session::handle_text`]; room-scoped messages are dropped
//! unless the session is `InRoom`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::error::GameError;
use crate::game::Role;
use crate::room::turn::schedule_turn_advance;
use crate::room::RoomRegistry;
use crate::websocket::message::{ClientMessage, ServerMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    JoinPending,
    InRoom { room_id: String, player_id: String },
    Closed,
}

pub struct Session {
    id: Uuid,
    sender: UnboundedSender<Message>,
    state: ConnectionState,
    registry: Arc<RoomRegistry>,
    turn_advance_delay: Duration,
}

impl Session {
    pub fn new(
        registry: Arc<RoomRegistry>,
        turn_advance_delay: Duration,
        sender: UnboundedSender<Message>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            state: ConnectionState::Connected,
            registry,
            turn_advance_delay,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Handle one inbound text frame. Never fails the connection: malformed
    /// frames are logged and dropped, request errors become `ERROR` replies.
    pub async fn handle_text(&mut self, text: &str) {
        if self.state == ConnectionState::Closed {
            return;
        }

        let result = match ClientMessage::parse(text) {
            Ok(message) => self.dispatch(message, text).await,
            Err(e) => Err(e),
        };

        if let Err(err) = result {
            if err.is_reportable() {
                tracing::warn!("Connection {}: {}", self.id, err);
                self.reply_error(&err);
            } else {
                tracing::warn!("Connection {}: dropping frame: {}", self.id, err);
            }
        }
    }

    async fn dispatch(&mut self, message: ClientMessage, raw: &str) -> Result<(), GameError> {
        if let ClientMessage::JoinRoom {
            room_id,
            player_id,
            role,
        } = message
        {
            return self.join(room_id, player_id, role).await;
        }

        let ConnectionState::InRoom { room_id, player_id } = &self.state else {
            tracing::debug!(
                "Connection {}: {} before joining a room, dropped",
                self.id,
                message.kind()
            );
            return Ok(());
        };

        match message {
            ClientMessage::StartNewTurn { .. } => {
                self.registry.start_new_turn(room_id).await;
            }
            ClientMessage::SubmitGuess { guess, .. } => {
                let guess = guess
                    .filter(|g| !g.trim().is_empty())
                    .ok_or_else(|| GameError::Validation("Palpite vazio".to_string()))?;

                let evaluation = self
                    .registry
                    .submit_guess(room_id, player_id, &guess)
                    .await?;

                if evaluation.is_some_and(|e| e.advance_turn) {
                    schedule_turn_advance(
                        Arc::clone(&self.registry),
                        room_id.clone(),
                        self.turn_advance_delay,
                    );
                }
            }
            ClientMessage::Draw(target) | ClientMessage::Clear(target) => {
                tracing::debug!("Room {}: relaying stroke for {:?}", room_id, target.drawer_id);
                self.registry.relay(room_id, raw).await;
            }
            // handled above
            ClientMessage::JoinRoom { .. } => {}
        }

        Ok(())
    }

    async fn join(
        &mut self,
        room_id: Option<String>,
        player_id: Option<String>,
        role: Option<Role>,
    ) -> Result<(), GameError> {
        let (Some(room_id), Some(player_id)) = (non_blank(room_id), non_blank(player_id)) else {
            return Err(GameError::Validation(
                "roomId e playerId são obrigatórios".to_string(),
            ));
        };

        if let ConnectionState::InRoom { room_id: current, .. } = &self.state {
            return Err(GameError::Validation(format!(
                "Conexão já está na sala {}",
                current
            )));
        }

        let previous = std::mem::replace(&mut self.state, ConnectionState::JoinPending);
        let joined = self
            .registry
            .join(&room_id, self.id, &player_id, role, self.sender.clone())
            .await;

        match joined {
            Ok(()) => {
                self.state = ConnectionState::InRoom { room_id, player_id };
                Ok(())
            }
            Err(err) => {
                self.state = previous;
                Err(err)
            }
        }
    }

    /// Transport closed: leave the room (deleting it if now empty).
    pub async fn close(&mut self) {
        let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
        if let ConnectionState::InRoom { room_id, player_id } = state {
            tracing::info!("Player {} disconnected from room {}", player_id, room_id);
            self.registry.leave(&room_id, &self.id).await;
        }
    }

    fn reply_error(&self, err: &GameError) {
        let message = ServerMessage::Error {
            message: err.to_string(),
        };
        let _ = self.sender.send(message.to_ws_message());
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
