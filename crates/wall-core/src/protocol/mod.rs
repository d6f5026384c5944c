//! Protocol module containing resource paths, payload types, the request
//! descriptor, and the JSON codec.

pub mod codec;
pub mod commands;
pub mod messages;
pub mod paths;
pub mod request;

pub use codec::ProtocolError;
pub use commands::{cursor_command, CursorCommand};
pub use request::{ApiRequest, Verb};
