pub mod config;
pub mod error;
pub mod game;
pub mod room;
pub mod websocket;

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use config::{Config, GameConfig};
use room::RoomRegistry;

/// Application state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub turn_advance_delay: Duration,
}

impl AppState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::from_config(config)),
            turn_advance_delay: Duration::from_millis(config.turn_advance_delay_ms),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub rooms: usize,
    pub connections: usize,
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

async fn stats_handler(State(state): State<AppState>) -> Json<Stats> {
    Json(Stats {
        rooms: state.registry.room_count().await,
        connections: state.registry.connection_count().await,
    })
}

/// Build the HTTP router: websocket endpoint, health/stats and optional static files
pub fn router(config: &Config, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route(&config.server.ws_path, get(websocket::ws_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler));

    if let Some(dir) = config.server.static_dir.as_ref().filter(|d| d.is_dir()) {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(cors).with_state(state)
}
