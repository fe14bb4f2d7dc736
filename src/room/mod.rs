pub mod connection;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod room;
pub mod turn;

pub use connection::Connection;
pub use registry::{RoomHandle, RoomRegistry};
pub use room::{Room, RoomSnapshot};
