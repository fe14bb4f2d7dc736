use serde::Serialize;
use uuid::Uuid;

use crate::error::GameError;
use crate::game::{DrawerSlot, Evaluation, GameState, Role};
use crate::room::Connection;
use crate::websocket::message::ServerMessage;

/// The `game` object clients receive: room id plus the full game state.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot<'a> {
    #[serde(rename = "roomId")]
    pub room_id: &'a str,
    #[serde(flatten)]
    pub game: &'a GameState,
}

/// One game session. Only ever touched behind the registry's per-room lock.
pub struct Room {
    id: String,
    /// In join order
    connections: Vec<Connection>,
    drawer_labels: [String; 2],
    pub(crate) game: GameState,
}

impl Room {
    pub fn new(id: &str, drawer1_label: &str, drawer2_label: &str) -> Self {
        Self {
            id: id.to_string(),
            connections: Vec::new(),
            drawer_labels: [drawer1_label.to_string(), drawer2_label.to_string()],
            game: GameState::new(drawer1_label, drawer2_label),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.connections.iter().any(|c| c.player_id == player_id)
    }

    /// Role for a joining player: the requested one, else the drawer slot
    /// whose label matches the player id, else guesser.
    pub fn resolve_role(&self, player_id: &str, requested: Option<Role>) -> Role {
        if let Some(role) = requested {
            return role;
        }
        if player_id == self.drawer_labels[0] {
            Role::Drawer1
        } else if player_id == self.drawer_labels[1] {
            Role::Drawer2
        } else {
            Role::Guesser
        }
    }

    /// Register a connection. Rejects a player id already present.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), GameError> {
        if self.has_player(&connection.player_id) {
            return Err(GameError::DuplicatePlayer {
                player_id: connection.player_id,
                room_id: self.id.clone(),
            });
        }
        self.connections.push(connection);
        Ok(())
    }

    pub fn remove_connection(&mut self, id: &Uuid) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == *id)?;
        Some(self.connections.remove(index))
    }

    /// Id of the earliest-joined player holding `slot`, or the slot's label.
    pub fn drawer_id(&self, slot: DrawerSlot) -> String {
        let role = slot.role();
        self.connections
            .iter()
            .find(|c| c.role == role)
            .map(|c| c.player_id.clone())
            .unwrap_or_else(|| match slot {
                DrawerSlot::Drawer1 => self.drawer_labels[0].clone(),
                DrawerSlot::Drawer2 => self.drawer_labels[1].clone(),
            })
    }

    pub fn submit_guess(&mut self, player_id: &str, text: &str) -> Result<Evaluation, GameError> {
        self.game.submit_guess(player_id, text)
    }

    pub fn snapshot(&self) -> RoomSnapshot<'_> {
        RoomSnapshot {
            room_id: &self.id,
            game: &self.game,
        }
    }

    /// Send a server message to every open connection in the room
    pub fn broadcast(&self, message: &ServerMessage<'_>) -> usize {
        self.broadcast_text(&message.to_json())
    }

    /// Relay a raw frame to every open connection. Closed transports are
    /// skipped; returns how many connections accepted the frame.
    pub fn broadcast_text(&self, text: &str) -> usize {
        self.connections
            .iter()
            .filter(|c| c.is_open())
            .filter(|c| c.send_text(text))
            .count()
    }

    /// Send a server message to a single connection
    pub fn send_to(&self, id: &Uuid, message: &ServerMessage<'_>) -> bool {
        self.connections
            .iter()
            .find(|c| c.id == *id)
            .map(|c| c.send_text(&message.to_json()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::Message;
    use tokio::sync::mpsc;

    fn connect(room: &mut Room, player_id: &str) -> (Uuid, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let role = room.resolve_role(player_id, None);
        room.add_connection(Connection::new(id, player_id.to_string(), role, tx))
            .unwrap();
        (id, rx)
    }

    #[test]
    fn test_new_room() {
        let room = Room::new("R1", "player1", "player2");
        assert_eq!(room.id(), "R1");
        assert!(room.is_empty());
        assert!(room.game().puzzle.is_none());
    }

    #[test]
    fn test_add_remove_connection() {
        let mut room = Room::new("R1", "player1", "player2");
        let (id, _rx) = connect(&mut room, "player1");
        assert_eq!(room.connection_count(), 1);
        assert!(room.has_player("player1"));

        assert!(room.remove_connection(&id).is_some());
        assert!(room.remove_connection(&id).is_none());
        assert!(room.is_empty());
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let mut room = Room::new("R1", "player1", "player2");
        let (_id, _rx) = connect(&mut room, "player3");

        let (tx, _rx2) = mpsc::unbounded_channel();
        let result = room.add_connection(Connection::new(
            Uuid::new_v4(),
            "player3".into(),
            Role::Guesser,
            tx,
        ));
        assert!(matches!(result, Err(GameError::DuplicatePlayer { .. })));
        assert_eq!(room.connection_count(), 1);
    }

    #[test]
    fn test_resolve_role() {
        let room = Room::new("R1", "player1", "player2");
        assert_eq!(room.resolve_role("player1", None), Role::Drawer1);
        assert_eq!(room.resolve_role("player2", None), Role::Drawer2);
        assert_eq!(room.resolve_role("ana", None), Role::Guesser);
        assert_eq!(room.resolve_role("ana", Some(Role::Drawer2)), Role::Drawer2);
    }

    #[test]
    fn test_drawer_id_falls_back_to_label() {
        let mut room = Room::new("R1", "player1", "player2");
        assert_eq!(room.drawer_id(DrawerSlot::Drawer1), "player1");

        let (tx, _rx) = mpsc::unbounded_channel();
        room.add_connection(Connection::new(Uuid::new_v4(), "ana".into(), Role::Drawer1, tx))
            .unwrap();
        assert_eq!(room.drawer_id(DrawerSlot::Drawer1), "ana");
        assert_eq!(room.drawer_id(DrawerSlot::Drawer2), "player2");
    }

    #[test]
    fn test_broadcast_skips_closed_connections() {
        let mut room = Room::new("R1", "player1", "player2");
        let (_a, mut rx_a) = connect(&mut room, "player1");
        let (_b, rx_b) = connect(&mut room, "player2");
        drop(rx_b);

        let delivered = room.broadcast_text("{\"type\":\"CLEAR\"}");
        assert_eq!(delivered, 1);

        if let Ok(Message::Text(text)) = rx_a.try_recv() {
            assert_eq!(text.as_str(), "{\"type\":\"CLEAR\"}");
        } else {
            panic!("Expected text frame");
        }
    }

    #[test]
    fn test_snapshot_includes_room_id() {
        let room = Room::new("R1", "player1", "player2");
        let json = serde_json::to_value(room.snapshot()).unwrap();
        assert_eq!(json["roomId"], "R1");
        assert!(json["word"].is_null());
        assert_eq!(json["drawer2"]["id"], "player2");
    }
}
