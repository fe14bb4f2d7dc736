use rand::Rng;
use serde::{Deserialize, Serialize};

/// A compound word split into the two halves the drawers illustrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub parts: [String; 2],
    pub keyword: String,
}

impl Puzzle {
    pub fn new(first: &str, second: &str, keyword: &str) -> Self {
        Self {
            parts: [first.to_string(), second.to_string()],
            keyword: keyword.to_string(),
        }
    }
}

/// Comparison form shared by every guess check: trimmed, Unicode uppercase.
pub fn normalize(text: &str) -> String {
    text.trim().to_uppercase()
}

/// Built-in puzzles, used unless the config provides its own list
const BUILTIN_WORDS: &[(&str, &str, &str)] = &[
    ("GUARDA", "CHUVA", "GUARDA-CHUVA"),
    ("CACHORRO", "QUENTE", "CACHORRO-QUENTE"),
    ("PÃO", "DE QUEIJO", "PÃO DE QUEIJO"),
    ("PÉ", "DE MOLEQUE", "PÉ DE MOLEQUE"),
    ("ARCO", "ÍRIS", "ARCO-ÍRIS"),
    ("COUVE", "FLOR", "COUVE-FLOR"),
    ("GUARDA", "ROUPA", "GUARDA-ROUPA"),
    ("BEIJA", "FLOR", "BEIJA-FLOR"),
    ("SEGUNDA", "FEIRA", "SEGUNDA-FEIRA"),
    ("SALVA", "VIDAS", "SALVA-VIDAS"),
];

/// Immutable, never-empty table of puzzles.
#[derive(Debug, Clone)]
pub struct WordBank {
    puzzles: Vec<Puzzle>,
}

impl WordBank {
    /// Build from a custom list; an empty list yields the built-in bank.
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        if puzzles.is_empty() {
            return Self::builtin();
        }
        Self { puzzles }
    }

    pub fn builtin() -> Self {
        Self {
            puzzles: BUILTIN_WORDS
                .iter()
                .map(|(first, second, keyword)| Puzzle::new(first, second, keyword))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// Pick a puzzle uniformly at random
    pub fn choose(&self) -> Puzzle {
        let mut rng = rand::thread_rng();
        let index = rng.gen_range(0..self.puzzles.len());
        self.puzzles[index].clone()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}
