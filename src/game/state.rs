use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::guess::{evaluate, Evaluation, Guess};
use crate::game::puzzle::Puzzle;

/// One of the two drawing roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawerSlot {
    #[serde(rename = "DRAWER_1")]
    Drawer1,
    #[serde(rename = "DRAWER_2")]
    Drawer2,
}

/// What a connected player does in the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DRAWER_1")]
    Drawer1,
    #[serde(rename = "DRAWER_2")]
    Drawer2,
    #[serde(rename = "GUESSER")]
    Guesser,
}

impl DrawerSlot {
    pub fn role(self) -> Role {
        match self {
            DrawerSlot::Drawer1 => Role::Drawer1,
            DrawerSlot::Drawer2 => Role::Drawer2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerAssignment {
    #[serde(rename = "id")]
    pub player_id: String,
    pub word: String,
}

impl DrawerAssignment {
    fn unassigned(label: &str) -> Self {
        Self {
            player_id: label.to_string(),
            word: String::new(),
        }
    }
}

/// Authoritative game state of one room, serialized as the `game` snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(rename = "word")]
    pub puzzle: Option<Puzzle>,
    pub drawer1: DrawerAssignment,
    pub drawer2: DrawerAssignment,
    pub guesses: Vec<Guess>,
    /// Turns solved in this room
    pub score: u32,
    pub parts_guessed: Vec<String>,
    /// Current turn already counted in `score`
    #[serde(skip)]
    solved: bool,
}

impl GameState {
    pub fn new(drawer1_label: &str, drawer2_label: &str) -> Self {
        Self {
            puzzle: None,
            drawer1: DrawerAssignment::unassigned(drawer1_label),
            drawer2: DrawerAssignment::unassigned(drawer2_label),
            guesses: Vec::new(),
            score: 0,
            parts_guessed: Vec::new(),
            solved: false,
        }
    }

    /// Install `puzzle` and hand each drawer their part; clears guess history.
    pub fn start_turn(&mut self, puzzle: Puzzle, drawer1_id: String, drawer2_id: String) {
        let [first, second] = puzzle.parts.clone();
        self.drawer1 = DrawerAssignment {
            player_id: drawer1_id,
            word: first,
        };
        self.drawer2 = DrawerAssignment {
            player_id: drawer2_id,
            word: second,
        };
        self.guesses.clear();
        self.parts_guessed.clear();
        self.solved = false;
        self.puzzle = Some(puzzle);
    }

    /// Evaluate and record a guess. Fails without touching state when no
    /// puzzle is active.
    pub fn submit_guess(&mut self, player_id: &str, text: &str) -> Result<Evaluation, GameError> {
        let puzzle = self.puzzle.as_ref().ok_or(GameError::NoActivePuzzle)?;
        let evaluation = evaluate(puzzle, &mut self.parts_guessed, text);

        self.guesses.push(Guess {
            user: player_id.to_string(),
            text: text.to_string(),
            kind: evaluation.kind,
        });
        if evaluation.advance_turn && !self.solved {
            self.solved = true;
            self.score += 1;
        }

        Ok(evaluation)
    }
}
