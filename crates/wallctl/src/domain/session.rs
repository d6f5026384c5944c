//! Persistent-channel types: lifecycle state, frames, and failures.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──connect──► Connecting ──ok──► Connected ──► Receiving ◄─┐
//!                       │                                │       │ frame
//!                       │ error                          └───────┘
//!                       ▼                                │ receive error / disconnect
//!                  Disconnected ◄────────────────────────┘
//! ```
//!
//! `Receiving` means exactly one receive is outstanding.  A failed receive
//! moves the channel to `Disconnected` even when nobody called `disconnect`.

use thiserror::Error;

/// Where the persistent channel is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection has been attempted yet.
    Idle,
    /// A connect is in flight.
    Connecting,
    /// The handshake completed; the first receive has not been issued yet.
    Connected,
    /// One receive is outstanding.
    Receiving,
    /// The connection failed, closed, or was torn down.
    Disconnected,
}

/// WebSocket frame opcode, with the RFC 6455 numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum Opcode {
    Continuation = 0,
    Text = 1,
    Binary = 2,
    Close = 8,
    Ping = 9,
    Pong = 10,
}

impl Opcode {
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Close, ping and pong: connection housekeeping with no application data.
    pub fn is_control(self) -> bool {
        matches!(self, Opcode::Close | Opcode::Ping | Opcode::Pong)
    }
}

/// One frame received on the persistent channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// A text frame carrying `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            opcode: Opcode::Text,
            payload: text.into().into_bytes(),
        }
    }

    /// Decodes the payload as UTF-8.
    pub fn decode_text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.payload.clone())
    }
}

/// A decoded frame as delivered to the receive handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub opcode: Opcode,
    pub text: String,
}

/// Completion events of the persistent channel, for consumers that prefer a
/// channel over callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected(Result<(), SessionError>),
    Disconnected(Result<(), SessionError>),
    Sent(Result<(), SessionError>),
    Received(Result<Received, SessionError>),
}

/// Failures reported by the persistent channel.
///
/// Each variant has a stable numeric [`code`](SessionError::code) for host
/// integrations that surface errors as short integers; `0` means success.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The connection or handshake could not be established.
    #[error("failed to connect to {url}: {reason}")]
    ConnectFailed { url: String, reason: String },

    /// A send or disconnect was requested with no open connection.
    #[error("no open connection")]
    NotConnected,

    /// The peer closed the connection.
    #[error("connection closed by appliance")]
    Closed,

    /// An I/O or framing error on an open connection.
    #[error("connection I/O error: {0}")]
    Io(String),
}

impl SessionError {
    pub fn code(&self) -> i16 {
        match self {
            SessionError::ConnectFailed { .. } => 1,
            SessionError::NotConnected => 2,
            SessionError::Closed => 3,
            SessionError::Io(_) => 4,
        }
    }
}

/// Numeric form of a completion result: `0` on success, else the error code.
pub fn result_code(result: &Result<(), SessionError>) -> i16 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}
