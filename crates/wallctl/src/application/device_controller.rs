//! DeviceController: the appliance's control vocabulary.
//!
//! The controller turns operations like "select layout 2" or "press Up" into
//! command requests, and keeps the client-side state needed to interpret the
//! answers:
//!
//! - the [`LayoutCatalog`] from the last successful layout listing, which maps
//!   local indices to appliance layout ids;
//! - the [`MixerLevels`] cache from the last successful mixer fetch (or from
//!   [`DeviceController::set_mixer_cache`]).
//!
//! # Serialization
//!
//! Both pieces of state live in one `tokio::sync::Mutex`.  Every operation
//! that reads or writes them holds the lock across its whole
//! fetch/decode/replace cycle, so a listing racing a selection cannot observe
//! a half-updated catalog or select against a stale one mid-refresh.
//!
//! # Failure policy
//!
//! Operations return typed errors.  A failed fetch or a body that does not
//! decode leaves the cached state exactly as it was.  Callers that want the
//! `-1` surface of active-layout resolution use
//! [`DeviceController::active_layout_index`].

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wall_core::protocol::{codec, commands};
use wall_core::{
    index_or_sentinel, CursorKey, Layout, LayoutCatalog, LayoutError, MixerLevels, ProtocolError,
};

use crate::application::command_client::{
    CommandClient, CommandError, HttpTransport, MirrorObserver, RequestObserver,
};
use crate::application::session::SessionChannel;
use crate::domain::ControllerConfig;

/// Failures of a device controller operation.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The request did not complete.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The appliance answered with a body that could not be decoded, or a
    /// request body could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A local index outside the current catalog was selected.
    #[error("layout index {index} is out of range (catalog has {len} layouts)")]
    LayoutIndexOutOfRange { index: usize, len: usize },

    /// `set_mixer_levels` was called before any levels were fetched or
    /// assigned.
    #[error("mixer levels have not been loaded")]
    MixerNotLoaded,
}

impl From<LayoutError> for ControllerError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::IndexOutOfRange { index, len } => {
                ControllerError::LayoutIndexOutOfRange { index, len }
            }
        }
    }
}

/// State owned by the controller and guarded by its mutex.
#[derive(Debug, Default)]
struct ControllerState {
    catalog: LayoutCatalog,
    mixer: Option<MixerLevels>,
}

/// Controls one appliance over the command API and the persistent channel.
pub struct DeviceController {
    config: ControllerConfig,
    client: CommandClient,
    session: SessionChannel,
    state: Mutex<ControllerState>,
}

impl DeviceController {
    /// Creates a controller with an empty catalog and no mixer cache.
    ///
    /// When `config.debug` is set, every command is mirrored to
    /// `config.debug_host()` through the same transport.
    pub fn new(
        config: ControllerConfig,
        transport: Arc<dyn HttpTransport>,
        session: SessionChannel,
    ) -> Self {
        let client = CommandClient::new(transport, config.host.clone(), config.accept.clone());
        let controller = Self {
            config,
            client,
            session,
            state: Mutex::new(ControllerState::default()),
        };
        controller.apply_debug(controller.config.debug);
        controller
    }

    /// Settings the controller was created with.  `debug` here is the
    /// initial value; [`Self::debug_enabled`] reflects later toggles.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionChannel {
        &self.session
    }

    /// Turns request mirroring to the diagnostic port on or off.  Works
    /// through a shared reference, so an `Arc<DeviceController>` can be
    /// toggled while other tasks issue commands.
    pub fn set_debug(&self, enabled: bool) {
        info!(
            "debug mirroring {}",
            if enabled { "enabled" } else { "disabled" }
        );
        self.apply_debug(enabled);
    }

    /// Whether commands are currently mirrored to the diagnostic port.
    pub fn debug_enabled(&self) -> bool {
        self.client.has_observer()
    }

    fn apply_debug(&self, enabled: bool) {
        let observer = enabled.then(|| {
            Arc::new(MirrorObserver::new(
                self.client.transport(),
                self.config.debug_host(),
                self.config.accept.clone(),
            )) as Arc<dyn RequestObserver>
        });
        self.client.set_observer(observer);
    }

    // ── Layouts ───────────────────────────────────────────────────────────────

    /// Fetches the layout collection and replaces the catalog with it.
    ///
    /// Returns the new layout count.  On any failure the previous catalog is
    /// kept.
    pub async fn list_layouts(&self) -> Result<usize, ControllerError> {
        let mut state = self.state.lock().await;

        let body = self.client.execute(&commands::list_layouts()).await?;
        let layouts = codec::decode_layouts(&body).map_err(|e| {
            warn!("layout list not understood, keeping previous catalog: {e}");
            e
        })?;

        state.catalog.replace(layouts);
        debug!("catalog now holds {} layouts", state.catalog.len());
        Ok(state.catalog.len())
    }

    /// Fetches the active layout and resolves it against the catalog.
    ///
    /// `Ok(None)` means the appliance reported an id that is not in the
    /// current catalog (or the catalog is empty).
    pub async fn active_layout(&self) -> Result<Option<usize>, ControllerError> {
        let state = self.state.lock().await;

        let body = self.client.execute(&commands::active_layout()).await?;
        let id = codec::decode_active_layout(&body)?;
        let index = state.catalog.resolve(id);
        if index.is_none() {
            debug!("active layout id {id} is not in the catalog");
        }
        Ok(index)
    }

    /// Like [`active_layout`](Self::active_layout), but returns `-1` for every
    /// failure: transport error, undecodable body, or unknown id.
    pub async fn active_layout_index(&self) -> i32 {
        match self.active_layout().await {
            Ok(index) => index_or_sentinel(index),
            Err(e) => {
                warn!("active layout unavailable: {e}");
                index_or_sentinel(None)
            }
        }
    }

    /// Makes the layout at local `index` the active one.
    pub async fn select_layout(&self, index: usize) -> Result<(), ControllerError> {
        let state = self.state.lock().await;

        let id = state.catalog.id_at(index)?;
        self.client.execute(&commands::select_layout(id)?).await?;
        info!("selected layout {index} (id {id})");
        Ok(())
    }

    pub async fn layout_count(&self) -> usize {
        self.state.lock().await.catalog.len()
    }

    /// Snapshot of the catalog.
    pub async fn layouts(&self) -> Vec<Layout> {
        self.state.lock().await.catalog.as_slice().to_vec()
    }

    pub async fn layout_name(&self, index: usize) -> Option<String> {
        self.state
            .lock()
            .await
            .catalog
            .name_at(index)
            .map(str::to_string)
    }

    // ── Mixer ─────────────────────────────────────────────────────────────────

    /// Fetches the mixer levels and replaces the cache with them.
    pub async fn get_mixer_levels(&self) -> Result<MixerLevels, ControllerError> {
        let mut state = self.state.lock().await;

        let body = self.client.execute(&commands::mixer_levels()).await?;
        let levels = codec::decode_mixer_levels(&body).map_err(|e| {
            warn!("mixer levels not understood, keeping previous cache: {e}");
            e
        })?;

        state.mixer = Some(levels.clone());
        Ok(levels)
    }

    /// Writes the cached mixer levels back to the appliance, unchanged and in
    /// order.  The channel count is not checked locally.
    pub async fn set_mixer_levels(&self) -> Result<(), ControllerError> {
        let state = self.state.lock().await;

        let levels = state.mixer.as_ref().ok_or(ControllerError::MixerNotLoaded)?;
        self.client
            .execute(&commands::set_mixer_levels(levels)?)
            .await?;
        Ok(())
    }

    /// Replaces the mixer cache without contacting the appliance.
    pub async fn set_mixer_cache(&self, levels: MixerLevels) {
        self.state.lock().await.mixer = Some(levels);
    }

    /// Snapshot of the mixer cache.
    pub async fn mixer_levels(&self) -> Option<MixerLevels> {
        self.state.lock().await.mixer.clone()
    }

    // ── OSD and keys ──────────────────────────────────────────────────────────

    /// Shows the named on-screen display screen.
    pub async fn show_screen(&self, name: &str) -> Result<(), ControllerError> {
        self.client.execute(&commands::show_screen(name)?).await?;
        Ok(())
    }

    /// Sends the single request that `key` maps to.
    pub async fn cursor(&self, key: CursorKey) -> Result<(), ControllerError> {
        self.client.execute(&commands::cursor(key)?).await?;
        Ok(())
    }

    /// Numeric form of [`cursor`](Self::cursor): `1..=9` are Up to Exit,
    /// anything else is Exit.
    pub async fn cursor_code(&self, code: i16) -> Result<(), ControllerError> {
        self.cursor(CursorKey::from_code(code)).await
    }

    // ── Persistent channel ────────────────────────────────────────────────────

    /// Opens the persistent channel to `ws://{host}/1/sockets`.
    pub fn connect(&self) {
        self.session.connect(&self.config.socket_url());
    }

    pub fn disconnect(&self) -> JoinHandle<()> {
        self.session.disconnect()
    }

    pub fn websocket_send(&self, message: impl Into<String>) -> JoinHandle<()> {
        self.session.send(message)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
