//! Messenger abstractions (Telegram today).

pub mod delivery;
pub mod port;
pub mod types;
