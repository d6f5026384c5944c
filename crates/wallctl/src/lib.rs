//! wallctl library crate.
//!
//! This crate controls one networked video-wall appliance: it lists and
//! selects layouts, reads and writes audio mixer levels, drives the on-screen
//! display, relays cursor keys, and keeps a persistent WebSocket channel open
//! for appliance events.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! wallctl CLI (main.rs)
//!         ↓
//! [wallctl]
//!   ├── domain/           Pure types: ControllerConfig, session state and events
//!   ├── application/      SessionChannel, CommandClient, DeviceController
//!   └── infrastructure/
//!         ├── http/        reqwest HttpTransport
//!         ├── ws/          tokio-tungstenite SocketConnector
//!         └── config_file/ optional TOML config
//!         ↓
//! Appliance  http://{host}/1/...   ws://{host}/1/sockets
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `wall-core`, and reaches the
//!   network only through the `HttpTransport` and `SocketConnector` traits.
//! - `infrastructure` implements those traits with `reqwest` and
//!   `tokio-tungstenite`.

/// Domain layer: configuration and persistent-channel types (no I/O).
pub mod domain;

/// Application layer: session channel, command client, device controller.
pub mod application;

/// Infrastructure layer: HTTP and WebSocket adapters, config file.
pub mod infrastructure;
