//! Client signal surface: WebSocket sessions, room membership, and
//! notification fan-out.

pub mod notifier;
pub mod rooms;
pub mod sessions;
pub mod ws;

pub use notifier::{RoomNotifier, SessionNotifier};
pub use rooms::RoomRoster;
pub use sessions::{Connection, SessionRegistry};
