//! Infrastructure layer for wallctl.
//!
//! The infrastructure layer handles all I/O: HTTP requests to the command
//! API, the WebSocket persistent channel, and reading the config file.
//!
//! # Responsibilities
//!
//! - [`http`]: `reqwest` implementation of `HttpTransport`
//! - [`ws`]: `tokio-tungstenite` implementation of `SocketConnector`
//! - [`config_file`]: the optional TOML config file
//! - [`build_controller`]: wiring the production adapters into a
//!   `DeviceController`
//!
//! # What does NOT belong here?
//!
//! - Request building or response decoding (that is `wall-core` and the
//!   application layer)
//! - Argument parsing (that is done in `main.rs`)

pub mod config_file;
pub mod http;
pub mod ws;

use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::Handle;

use crate::application::{DeviceController, SessionChannel, SessionHandler};
use crate::domain::ControllerConfig;

pub use crate::application::TransportError;
pub use config_file::{load_config, ConfigError, FileConfig};
pub use http::ReqwestTransport;
pub use ws::TungsteniteConnector;

/// Builds a controller that talks to a real appliance.
///
/// Session tasks are spawned on the current Tokio runtime, so this must be
/// called from inside one.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed (for example,
/// when the TLS backend fails to initialise).
pub fn build_controller(
    config: ControllerConfig,
    handler: Arc<dyn SessionHandler>,
) -> anyhow::Result<DeviceController> {
    let transport =
        ReqwestTransport::new(config.request_timeout).context("failed to build HTTP client")?;
    let session = SessionChannel::new(Arc::new(TungsteniteConnector), handler, Handle::current());
    Ok(DeviceController::new(config, Arc::new(transport), session))
}
