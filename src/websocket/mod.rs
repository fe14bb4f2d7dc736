pub mod handler;
pub mod message;
pub mod session;

pub use handler::ws_handler;
pub use message::{ClientMessage, ServerMessage};
pub use session::{ConnectionState, Session};
