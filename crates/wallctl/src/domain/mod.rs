//! Domain layer for wallctl.
//!
//! Pure types with no dependencies on sockets, HTTP clients, or the async
//! runtime.
//!
//! # What belongs in the domain layer?
//!
//! - Controller configuration
//! - Persistent-channel lifecycle state, frames, and error codes
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `reqwest`, or WebSocket types
//! - File I/O or environment variable reading

pub mod config;
pub mod session;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::ControllerConfig` instead of the longer path.
pub use config::ControllerConfig;
pub use session::{
    result_code, Frame, Opcode, Received, SessionError, SessionEvent, SessionState,
};
