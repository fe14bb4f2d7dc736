//! Process-wide table of live rooms
//!
//! Lock order is always registry, then room. Join and leave hold the
//! registry write lock across the room update so "last player leaves,
//! room deleted" cannot interleave with "new player joins the same id".
//! Every other operation clones the room handle out of a read lock and
//! releases it before locking the room.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{Evaluation, Role, WordBank};
use crate::room::turn;
use crate::room::{Connection, Room};
use crate::websocket::message::ServerMessage;

pub type RoomHandle = Arc<Mutex<Room>>;

pub const JOIN_MESSAGE: &str = "Você entrou na sala.";

pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, RoomHandle>>,
    word_bank: WordBank,
    drawer_labels: [String; 2],
}

impl RoomRegistry {
    pub fn new(word_bank: WordBank, drawer1_label: &str, drawer2_label: &str) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            word_bank,
            drawer_labels: [drawer1_label.to_string(), drawer2_label.to_string()],
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            WordBank::new(config.words.clone()),
            &config.drawer1_label,
            &config.drawer2_label,
        )
    }

    pub fn word_bank(&self) -> &WordBank {
        &self.word_bank
    }

    /// Look up a live room
    pub async fn get(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(room_id).cloned()
    }

    /// Return the room for `room_id`, creating an empty one if needed.
    pub async fn get_or_create(&self, room_id: &str) -> RoomHandle {
        let mut rooms = self.rooms.write().await;
        self.entry(&mut rooms, room_id)
    }

    fn entry(&self, rooms: &mut HashMap<String, RoomHandle>, room_id: &str) -> RoomHandle {
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                tracing::info!("Room {} created", room_id);
                Arc::new(Mutex::new(Room::new(
                    room_id,
                    &self.drawer_labels[0],
                    &self.drawer_labels[1],
                )))
            })
            .clone()
    }

    /// Drop `room_id` from the table if nobody is connected to it.
    pub async fn remove(&self, room_id: &str) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get(room_id).cloned() else {
            return false;
        };
        if !room.lock().await.is_empty() {
            return false;
        }
        rooms.remove(room_id);
        tracing::info!("Room {} removed", room_id);
        true
    }

    /// Register a connection in `room_id` (creating the room on first join)
    /// and send it the current state. A player id already in the room is
    /// rejected and the room is left unchanged.
    pub async fn join(
        &self,
        room_id: &str,
        connection_id: Uuid,
        player_id: &str,
        requested_role: Option<Role>,
        sender: UnboundedSender<Message>,
    ) -> Result<(), GameError> {
        let mut rooms = self.rooms.write().await;
        let handle = self.entry(&mut rooms, room_id);
        let mut room = handle.lock().await;

        let role = room.resolve_role(player_id, requested_role);
        let connection = Connection::new(connection_id, player_id.to_string(), role, sender);
        let result = room.add_connection(connection);

        // A room created for a rejected join would otherwise linger empty.
        if room.is_empty() {
            rooms.remove(room_id);
        }
        result?;

        tracing::info!(
            "Player {} joined room {} as {:?} ({} connected)",
            player_id,
            room_id,
            role,
            room.connection_count()
        );

        room.send_to(
            &connection_id,
            &ServerMessage::GameStateUpdate {
                game: room.snapshot(),
                message: JOIN_MESSAGE.to_string(),
            },
        );
        Ok(())
    }

    /// Remove a connection; deletes the room when it was the last one.
    /// Returns true if the room was deleted.
    pub async fn leave(&self, room_id: &str, connection_id: &Uuid) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(handle) = rooms.get(room_id).cloned() else {
            return false;
        };

        let empty = {
            let mut room = handle.lock().await;
            if let Some(connection) = room.remove_connection(connection_id) {
                tracing::info!(
                    "Player {} left room {} ({} remaining)",
                    connection.player_id,
                    room_id,
                    room.connection_count()
                );
            }
            room.is_empty()
        };

        if empty {
            rooms.remove(room_id);
            tracing::info!("Room {} removed", room_id);
        }
        empty
    }

    /// Run the turn controller on `room_id`. Returns false if the room no
    /// longer exists.
    pub async fn start_new_turn(&self, room_id: &str) -> bool {
        let Some(handle) = self.get(room_id).await else {
            return false;
        };
        let mut room = handle.lock().await;
        turn::start_new_turn(&mut room, &self.word_bank);
        true
    }

    /// Evaluate a guess and broadcast the resulting state.
    ///
    /// `Ok(None)` means the room does not exist. With no active puzzle
    /// nothing is recorded or broadcast.
    pub async fn submit_guess(
        &self,
        room_id: &str,
        player_id: &str,
        text: &str,
    ) -> Result<Option<Evaluation>, GameError> {
        let Some(handle) = self.get(room_id).await else {
            return Ok(None);
        };
        let mut room = handle.lock().await;
        let evaluation = room.submit_guess(player_id, text)?;

        tracing::debug!(
            "Room {}: {} guessed {:?} -> {:?}",
            room_id,
            player_id,
            text,
            evaluation.kind
        );

        room.broadcast(&ServerMessage::GameStateUpdate {
            game: room.snapshot(),
            message: evaluation.message.clone(),
        });
        Ok(Some(evaluation))
    }

    /// Relay an opaque frame to everyone in `room_id`
    pub async fn relay(&self, room_id: &str, frame: &str) -> Option<usize> {
        let handle = self.get(room_id).await?;
        let room = handle.lock().await;
        Some(room.broadcast_text(frame))
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn connection_count(&self) -> usize {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();
        let mut total = 0;
        for handle in handles {
            total += handle.lock().await.connection_count();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GuessKind, Puzzle};
    use tokio::sync::mpsc;

    fn registry() -> RoomRegistry {
        RoomRegistry::new(
            WordBank::new(vec![Puzzle::new("GUARDA", "CHUVA", "GUARDA-CHUVA")]),
            "player1",
            "player2",
        )
    }

    fn next_json(rx: &mut mpsc::UnboundedReceiver<Message>) -> serde_json::Value {
        match rx.try_recv() {
            Ok(Message::Text(text)) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("Expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_join_creates_room_and_replies() {
        let registry = registry();
        let (tx, mut rx) = mpsc::unbounded_channel();

        registry
            .join("R1", Uuid::new_v4(), "player1", None, tx)
            .await
            .unwrap();

        assert_eq!(registry.room_count().await, 1);
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "GAME_STATE_UPDATE");
        assert_eq!(reply["payload"]["message"], JOIN_MESSAGE);
        assert_eq!(reply["payload"]["game"]["roomId"], "R1");
    }

    #[tokio::test]
    async fn test_duplicate_join_rejected() {
        let registry = registry();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.join("R1", Uuid::new_v4(), "player3", None, tx1).await.unwrap();
        let result = registry.join("R1", Uuid::new_v4(), "player3", None, tx2).await;

        assert!(matches!(result, Err(GameError::DuplicatePlayer { .. })));
        assert!(rx2.try_recv().is_err());
        let room = registry.get("R1").await.unwrap();
        assert_eq!(room.lock().await.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_last_leave_deletes_room_once() {
        let registry = registry();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        registry.join("R1", a, "player1", None, tx1).await.unwrap();
        registry.join("R1", b, "player2", None, tx2).await.unwrap();

        assert!(!registry.leave("R1", &a).await);
        assert!(registry.get("R1").await.is_some());
        assert!(registry.leave("R1", &b).await);
        assert!(registry.get("R1").await.is_none());
        assert!(!registry.leave("R1", &b).await);
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_rejoin_after_deletion_is_fresh() {
        let registry = registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();

        registry.join("R1", a, "player1", None, tx).await.unwrap();
        assert!(registry.start_new_turn("R1").await);
        registry.leave("R1", &a).await;

        let (tx, _rx) = mpsc::unbounded_channel();
        registry.join("R1", Uuid::new_v4(), "player1", None, tx).await.unwrap();
        let room = registry.get("R1").await.unwrap();
        let room = room.lock().await;
        assert!(room.game().puzzle.is_none());
        assert!(room.game().guesses.is_empty());
    }

    #[tokio::test]
    async fn test_remove_only_when_empty() {
        let registry = registry();
        registry.get_or_create("R2").await;
        assert!(registry.remove("R2").await);
        assert!(!registry.remove("R2").await);

        let (tx, _rx) = mpsc::unbounded_channel();
        registry.join("R3", Uuid::new_v4(), "player1", None, tx).await.unwrap();
        assert!(!registry.remove("R3").await);
    }

    #[tokio::test]
    async fn test_guess_without_puzzle_sends_nothing() {
        let registry = registry();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.join("R1", Uuid::new_v4(), "player3", None, tx).await.unwrap();
        let _join_reply = next_json(&mut rx);

        let result = registry.submit_guess("R1", "player3", "chuva").await;
        assert!(matches!(result, Err(GameError::NoActivePuzzle)));
        assert!(rx.try_recv().is_err());

        let room = registry.get("R1").await.unwrap();
        assert!(room.lock().await.game().guesses.is_empty());
    }

    #[tokio::test]
    async fn test_guess_broadcasts_state() {
        let registry = registry();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        registry.join("R1", Uuid::new_v4(), "player1", None, tx1).await.unwrap();
        registry.join("R1", Uuid::new_v4(), "player3", None, tx3).await.unwrap();
        registry.start_new_turn("R1").await;
        for rx in [&mut rx1, &mut rx3] {
            assert_eq!(next_json(rx)["type"], "GAME_STATE_UPDATE");
            assert_eq!(next_json(rx)["type"], "NEW_TURN");
        }

        let evaluation = registry
            .submit_guess("R1", "player3", "chuva")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(evaluation.kind, GuessKind::PartMatch);

        let update = next_json(&mut rx1);
        assert_eq!(update["type"], "GAME_STATE_UPDATE");
        assert_eq!(update["payload"]["game"]["partsGuessed"][0], "CHUVA");
        assert_eq!(next_json(&mut rx3), update);
    }

    #[tokio::test]
    async fn test_operations_on_missing_room() {
        let registry = registry();
        assert!(!registry.start_new_turn("nope").await);
        assert!(registry.submit_guess("nope", "p", "x").await.unwrap().is_none());
        assert!(registry.relay("nope", "{}").await.is_none());
    }

    #[tokio::test]
    async fn test_connection_count() {
        let registry = registry();
        for (room, player) in [("A", "player1"), ("A", "player2"), ("B", "player1")] {
            let (tx, _rx) = mpsc::unbounded_channel();
            registry.join(room, Uuid::new_v4(), player, None, tx).await.unwrap();
        }
        assert_eq!(registry.room_count().await, 2);
        assert_eq!(registry.connection_count().await, 3);
    }
}
