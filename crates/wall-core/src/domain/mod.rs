//! Domain entities for the appliance control client.
//!
//! This module contains pure client-side state with no infrastructure
//! dependencies.  Nothing here knows how a layout list or a mixer level array
//! reached the client; it only knows how to hold and query it.
//!
//! # What belongs in the domain layer?
//!
//! - The layout catalog and the local-index rules that go with it.
//! - The mixer level cache.
//! - The cursor key vocabulary a remote control can emit.
//!
//! Code in outer layers (protocol codec, transports, CLI) depends on the
//! domain, but the domain never depends on them.

/// Cursor and text keys relayed to the appliance's on-screen keyboard.
pub mod cursor;

/// Ordered layout catalog and active-layout resolution.
///
/// See [`layout::LayoutCatalog`] for the main type.
pub mod layout;

/// Mixer level cache.
pub mod mixer;
