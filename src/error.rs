use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    /// Missing or unusable request fields.
    #[error("{0}")]
    Validation(String),

    #[error("Nenhuma palavra ativa nesta sala")]
    NoActivePuzzle,

    #[error("Jogador {player_id} já está na sala {room_id}")]
    DuplicatePlayer { player_id: String, room_id: String },

    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl GameError {
    /// Whether the originating connection should receive an `ERROR` frame.
    /// Malformed frames are only logged.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, GameError::Malformed(_))
    }
}
