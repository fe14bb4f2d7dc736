//! Game rules: word bank, guess evaluation and per-room game state

pub mod guess;
pub mod puzzle;
pub mod state;

pub use guess::{evaluate, Evaluation, Guess, GuessKind};
pub use puzzle::{normalize, Puzzle, WordBank};
pub use state::{DrawerAssignment, DrawerSlot, GameState, Role};
