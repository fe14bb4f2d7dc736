//! Server configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) yields a working server.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::game::Puzzle;
use crate::room::turn::TURN_ADVANCE_DELAY;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub game: GameConfig,
}

/// Network and HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,

    /// Route that accepts websocket upgrades
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Directory served under `/static`, if present
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Game rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Delay between a solving guess and the automatic new turn
    #[serde(default = "default_turn_advance_delay_ms")]
    pub turn_advance_delay_ms: u64,

    /// Placeholder id for an unclaimed DRAWER_1 slot
    #[serde(default = "default_drawer1_label")]
    pub drawer1_label: String,

    /// Placeholder id for an unclaimed DRAWER_2 slot
    #[serde(default = "default_drawer2_label")]
    pub drawer2_label: String,

    /// Replaces the built-in word bank when non-empty
    #[serde(default)]
    pub words: Vec<Puzzle>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_ws_path() -> String {
    "/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_turn_advance_delay_ms() -> u64 {
    TURN_ADVANCE_DELAY.as_millis() as u64
}

fn default_drawer1_label() -> String {
    "player1".to_string()
}

fn default_drawer2_label() -> String {
    "player2".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            ws_path: default_ws_path(),
            static_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_advance_delay_ms: default_turn_advance_delay_ms(),
            drawer1_label: default_drawer1_label(),
            drawer2_label: default_drawer2_label(),
            words: Vec::new(),
        }
    }
}

/// Reserved routes the websocket endpoint may not shadow.
const RESERVED_PATHS: &[&str] = &["/health", "/stats", "/static"];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load from file when it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_file(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let ws_path = &config.server.ws_path;
        if !ws_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "ws_path '{}' must start with '/'",
                ws_path
            )));
        }
        if RESERVED_PATHS.contains(&ws_path.as_str()) {
            return Err(ConfigError::Validation(format!(
                "ws_path '{}' collides with a built-in route",
                ws_path
            )));
        }

        let game = &config.game;
        if game.drawer1_label.trim().is_empty() || game.drawer2_label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "drawer labels must not be empty".to_string(),
            ));
        }
        if game.drawer1_label == game.drawer2_label {
            return Err(ConfigError::Validation(format!(
                "drawer labels must differ (both are '{}')",
                game.drawer1_label
            )));
        }

        for (index, word) in game.words.iter().enumerate() {
            if word.keyword.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "word #{} has an empty keyword",
                    index
                )));
            }
            if word.parts.iter().any(|part| part.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "word '{}' has an empty part",
                    word.keyword
                )));
            }
        }

        Ok(())
    }
}
