use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::game::Role;

/// A player's socket as registered in a room
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: Uuid,
    pub player_id: String,
    pub role: Role,
    sender: UnboundedSender<Message>,
}

impl Connection {
    pub fn new(id: Uuid, player_id: String, role: Role, sender: UnboundedSender<Message>) -> Self {
        Self {
            id,
            player_id,
            role,
            sender,
        }
    }

    /// Queue a frame for this connection's writer task.
    /// Returns false when the transport has already gone away.
    pub fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }

    pub fn send_text(&self, text: &str) -> bool {
        self.send(Message::Text(text.into()))
    }

    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}
