//! # Map Protocol
//!
//! JSON messages exchanged with the live map server. Every message is an
//! envelope of the form `{"type": "...", "payload": {...}}`.

mod client;
mod server;

pub use self::client::*;
pub use self::server::*;
