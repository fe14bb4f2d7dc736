use serde::Serialize;

use crate::game::puzzle::{normalize, Puzzle};

/// How a submitted guess matched the active puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuessKind {
    #[serde(rename = "guess")]
    Guess,
    #[serde(rename = "correct_part")]
    PartMatch,
    #[serde(rename = "correct_keyword")]
    KeywordMatch,
}

/// One entry of a room's guess history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guess {
    pub user: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: GuessKind,
}

/// Outcome of [`evaluate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub kind: GuessKind,
    pub message: String,
    /// Set when the guess solved the turn
    pub advance_turn: bool,
}

pub const RETRY_MESSAGE: &str = "Não foi dessa vez, tente novamente!";
pub const BOTH_PARTS_MESSAGE: &str = "Incrível! Vocês descobriram as duas partes da palavra!";

/// Classify `text` against `puzzle`, recording newly discovered parts in
/// `parts_guessed` (stored uppercased).
///
/// Keyword beats parts, and a part already in `parts_guessed` earns no
/// credit. Comparison is plain string equality on the normalized forms, so
/// punctuation inside parts and keywords is matched literally.
pub fn evaluate(puzzle: &Puzzle, parts_guessed: &mut Vec<String>, text: &str) -> Evaluation {
    let attempt = normalize(text);

    if attempt == normalize(&puzzle.keyword) {
        return Evaluation {
            kind: GuessKind::KeywordMatch,
            message: format!(
                "Parabéns! Você acertou a palavra-chave: {}!",
                puzzle.keyword
            ),
            advance_turn: true,
        };
    }

    for part in &puzzle.parts {
        let target = normalize(part);
        if attempt == target && !parts_guessed.contains(&target) {
            parts_guessed.push(target);

            if both_parts_found(puzzle, parts_guessed) {
                return Evaluation {
                    kind: GuessKind::PartMatch,
                    message: BOTH_PARTS_MESSAGE.to_string(),
                    advance_turn: true,
                };
            }

            return Evaluation {
                kind: GuessKind::PartMatch,
                message: format!("Boa! Você descobriu a parte \"{}\"!", part),
                advance_turn: false,
            };
        }
    }

    Evaluation {
        kind: GuessKind::Guess,
        message: RETRY_MESSAGE.to_string(),
        advance_turn: false,
    }
}

fn both_parts_found(puzzle: &Puzzle, parts_guessed: &[String]) -> bool {
    puzzle
        .parts
        .iter()
        .all(|part| parts_guessed.contains(&normalize(part)))
}
