//! Turn controller: new puzzle selection and delayed turn advancement

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::game::{DrawerSlot, WordBank};
use crate::room::{Room, RoomRegistry};
use crate::websocket::message::ServerMessage;

pub const NEW_TURN_MESSAGE: &str = "Um novo turno começou!";

/// Default pause between a solving guess and the next turn
pub const TURN_ADVANCE_DELAY: Duration = Duration::from_millis(3000);

/// Pick a fresh puzzle, deal its parts to the drawers, clear guesses and
/// announce `NEW_TURN` to everyone in the room.
pub fn start_new_turn(room: &mut Room, word_bank: &WordBank) {
    let puzzle = word_bank.choose();
    let drawer1 = room.drawer_id(DrawerSlot::Drawer1);
    let drawer2 = room.drawer_id(DrawerSlot::Drawer2);

    tracing::info!(
        "Room {}: new turn ({} draws {}, {} draws {})",
        room.id(),
        drawer1,
        puzzle.parts[0],
        drawer2,
        puzzle.parts[1]
    );

    room.game.start_turn(puzzle, drawer1, drawer2);

    let message = ServerMessage::NewTurn {
        game: room.snapshot(),
        message: NEW_TURN_MESSAGE.to_string(),
    };
    room.broadcast(&message);
}

/// Start a new turn in `room_id` after `delay`.
///
/// The room is looked up again when the timer fires; if it was deleted in
/// the meantime the timer does nothing. Timers are never cancelled, so a
/// second solve before the first fires simply reshuffles twice.
pub fn schedule_turn_advance(
    registry: Arc<RoomRegistry>,
    room_id: String,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if !registry.start_new_turn(&room_id).await {
            tracing::debug!("Turn advance for {} skipped: room is gone", room_id);
        }
    })
}
