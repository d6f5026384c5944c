//! # wall-core
//!
//! Shared library for the video-wall appliance control client containing the
//! domain entities, REST resource paths, and the JSON payload codec.
//!
//! This crate has zero dependencies on sockets, HTTP clients, or async
//! runtimes.  Everything here can be unit-tested without an appliance.
//!
//! # Architecture overview
//!
//! The appliance is driven through two channels:
//!
//! - A REST-like command API (`http://{host}/1/...`) used to list and select
//!   layouts, read and write mixer levels, show on-screen displays, and relay
//!   key presses.
//! - A persistent WebSocket (`ws://{host}/1/sockets`) that carries events.
//!
//! This crate defines *what* travels over the command API:
//!
//! - **`domain`** – The client-side state needed to interpret appliance
//!   responses: the [`LayoutCatalog`], the [`MixerLevels`] cache, and the
//!   [`CursorKey`] vocabulary.
//!
//! - **`protocol`** – Resource paths, JSON payload types, the
//!   [`ApiRequest`] descriptor that names one request/response cycle, and the
//!   codec that turns response bodies into domain values.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `wall_core::LayoutCatalog` instead of `wall_core::domain::layout::LayoutCatalog`.
pub use domain::cursor::{CursorKey, UnknownKeyName};
pub use domain::layout::{index_or_sentinel, Layout, LayoutCatalog, LayoutError, LayoutId, NOT_FOUND};
pub use domain::mixer::{MixerLevel, MixerLevels};
pub use protocol::codec::ProtocolError;
pub use protocol::request::{ApiRequest, Verb};
