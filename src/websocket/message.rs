//! Wire protocol: JSON text frames of the form `{"type": ..., "payload": {...}}`

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::{DrawerSlot, Role};
use crate::room::RoomSnapshot;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    #[serde(rename = "JOIN_ROOM", rename_all = "camelCase")]
    JoinRoom {
        room_id: Option<String>,
        player_id: Option<String>,
        role: Option<Role>,
    },
    #[serde(rename = "START_NEW_TURN", rename_all = "camelCase")]
    StartNewTurn { room_id: Option<String> },
    #[serde(rename = "SUBMIT_GUESS", rename_all = "camelCase")]
    SubmitGuess {
        room_id: Option<String>,
        player_id: Option<String>,
        guess: Option<String>,
    },
    /// Stroke data; everything but the drawer slot is opaque
    #[serde(rename = "DRAW")]
    Draw(StrokeTarget),
    #[serde(rename = "CLEAR")]
    Clear(StrokeTarget),
}

/// The only part of a `DRAW`/`CLEAR` payload the server reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StrokeTarget {
    #[serde(rename = "drawerId")]
    pub drawer_id: DrawerSlot,
}

/// Just the discriminator, read before the full frame
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
}

impl ClientMessage {
    /// Frames that are not JSON or carry an unknown type are `Malformed`.
    /// A `JOIN_ROOM` with unusable fields is a `Validation` error so the
    /// sender gets an answer.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        serde_json::from_str(text).map_err(|err| {
            if envelope.kind == "JOIN_ROOM" {
                GameError::Validation(format!("Pedido de entrada inválido: {}", err))
            } else {
                GameError::Malformed(err)
            }
        })
    }

    /// Wire name of the message type, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::JoinRoom { .. } => "JOIN_ROOM",
            ClientMessage::StartNewTurn { .. } => "START_NEW_TURN",
            ClientMessage::SubmitGuess { .. } => "SUBMIT_GUESS",
            ClientMessage::Draw(_) => "DRAW",
            ClientMessage::Clear(_) => "CLEAR",
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage<'a> {
    /// Replace the client's game state
    GameStateUpdate {
        game: RoomSnapshot<'a>,
        message: String,
    },
    /// Replace the game state and wipe both canvases
    NewTurn {
        game: RoomSnapshot<'a>,
        message: String,
    },
    Error { message: String },
}

impl ServerMessage<'_> {
    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.to_json().into())
    }
}
