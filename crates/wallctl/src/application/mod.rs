//! Application layer for wallctl.
//!
//! The application layer knows *what* to send to the appliance and *how to
//! interpret* the answers, but delegates the actual network I/O to the
//! transport traits defined here and implemented in `infrastructure`.
//!
//! # Responsibilities
//!
//! - [`session`]: the persistent channel and its single receive loop
//! - [`command_client`]: one request/response cycle per verb, plus the debug
//!   mirror observer
//! - [`device_controller`]: layouts, mixer, OSD and cursor keys, with the
//!   cached state needed to resolve appliance responses
//!
//! # What does NOT belong here?
//!
//! - reqwest or tokio-tungstenite types (that is infrastructure)
//! - Argument parsing or subscriber setup (that is `main.rs`)

pub mod command_client;
pub mod device_controller;
pub mod session;

pub use command_client::{
    CommandClient, CommandError, HttpTransport, MirrorObserver, RequestObserver, TransportError,
};
pub use device_controller::{ControllerError, DeviceController};
pub use session::{
    ChannelHandler, FrameSink, FrameSource, NoopHandler, SessionChannel, SessionHandler,
    SocketConnector,
};
