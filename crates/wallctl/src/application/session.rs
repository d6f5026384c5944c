//! Session channel: the persistent event connection to the appliance.
//!
//! [`SessionChannel`] owns one connection at a time and keeps exactly one
//! receive outstanding on it.  Every operation is a non-blocking dispatch: the
//! call returns immediately and the outcome is reported to a
//! [`SessionHandler`] from a Tokio task.
//!
//! # Receive loop
//!
//! After a successful connect, a single task runs:
//!
//! ```text
//! loop {
//!     frame = source.receive().await      ← the only receive in flight
//!     Ok(frame)  → store text in the receive buffer, call on_receive, loop
//!     Err(e)     → call on_receive(Err), mark Disconnected, stop
//! }
//! ```
//!
//! The next receive is issued only after the previous one completed, so no
//! read is ever abandoned and there is never more than one.  A frame whose
//! payload is not valid UTF-8 is logged and skipped; the loop keeps going.
//! Control frames (ping, pong) are skipped the same way and never touch the
//! receive buffer.
//!
//! Once `disconnect` has run, the loop delivers nothing more: a frame that
//! was already in flight is dropped and the loop ends.
//!
//! # Failures
//!
//! No operation returns an error to its caller.  Connect, send, and
//! disconnect failures are logged and reported through the matching handler
//! method with a [`SessionError`].

use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::session::{Frame, Received, SessionError, SessionEvent, SessionState};

// ── Transport seams ───────────────────────────────────────────────────────────

/// Write half of an open connection.
#[async_trait]
pub trait FrameSink: Send {
    /// Sends `text` as a single text frame.
    async fn send_text(&mut self, text: String) -> Result<(), SessionError>;

    /// Starts the closing handshake.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Read half of an open connection.
#[async_trait]
pub trait FrameSource: Send {
    /// Waits for the next frame.  An error means the connection is unusable.
    async fn receive(&mut self) -> Result<Frame, SessionError>;
}

/// Opens connections.  The production implementation is
/// [`crate::infrastructure::ws::TungsteniteConnector`].
#[async_trait]
pub trait SocketConnector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>), SessionError>;
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Completion callbacks.  Every method defaults to doing nothing, so a
/// handler only implements the events it cares about.
///
/// Methods are called from Tokio worker threads, never from the thread that
/// issued the operation.
pub trait SessionHandler: Send + Sync {
    fn on_connect(&self, _result: &Result<(), SessionError>) {}
    fn on_disconnect(&self, _result: &Result<(), SessionError>) {}
    fn on_send(&self, _result: &Result<(), SessionError>) {}
    fn on_receive(&self, _result: &Result<Received, SessionError>) {}
}

/// Handler that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl SessionHandler for NoopHandler {}

/// Handler that forwards every event into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: SessionEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}

impl SessionHandler for ChannelHandler {
    fn on_connect(&self, result: &Result<(), SessionError>) {
        self.forward(SessionEvent::Connected(result.clone()));
    }

    fn on_disconnect(&self, result: &Result<(), SessionError>) {
        self.forward(SessionEvent::Disconnected(result.clone()));
    }

    fn on_send(&self, result: &Result<(), SessionError>) {
        self.forward(SessionEvent::Sent(result.clone()));
    }

    fn on_receive(&self, result: &Result<Received, SessionError>) {
        self.forward(SessionEvent::Received(result.clone()));
    }
}

// ── Channel ───────────────────────────────────────────────────────────────────

/// State shared between the channel handle and its tasks.
struct Shared {
    state: StdMutex<SessionState>,
    sink: Mutex<Option<Box<dyn FrameSink>>>,
    /// Text of the most recent frame; overwritten before each `on_receive`.
    rx_buffer: StdMutex<Option<String>>,
    receive_task: StdMutex<Option<JoinHandle<()>>>,
}

/// Locks a std mutex, recovering the data if a handler panicked while
/// holding it.
fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn set_state(&self, state: SessionState) {
        *lock(&self.state) = state;
    }

    /// Moves to `Receiving`, but only from `Connected` or `Receiving`.
    /// Returns `false` when the connection was torn down in the meantime.
    fn begin_receive(&self) -> bool {
        let mut state = lock(&self.state);
        match *state {
            SessionState::Connected | SessionState::Receiving => {
                *state = SessionState::Receiving;
                true
            }
            _ => false,
        }
    }

    fn is_receiving(&self) -> bool {
        *lock(&self.state) == SessionState::Receiving
    }
}

/// One persistent connection plus its receive loop.
pub struct SessionChannel {
    connector: Arc<dyn SocketConnector>,
    handler: Arc<dyn SessionHandler>,
    runtime: Handle,
    shared: Arc<Shared>,
}

impl SessionChannel {
    /// Creates an idle channel.  Tasks are spawned on `runtime`.
    pub fn new(
        connector: Arc<dyn SocketConnector>,
        handler: Arc<dyn SessionHandler>,
        runtime: Handle,
    ) -> Self {
        Self {
            connector,
            handler,
            runtime,
            shared: Arc::new(Shared {
                state: StdMutex::new(SessionState::Idle),
                sink: Mutex::new(None),
                rx_buffer: StdMutex::new(None),
                receive_task: StdMutex::new(None),
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *lock(&self.shared.state)
    }

    /// Text of the most recently received frame.
    ///
    /// The slot is overwritten on every receive; read it from inside
    /// `on_receive` or accept that a newer frame may have replaced it.
    pub fn last_received(&self) -> Option<String> {
        lock(&self.shared.rx_buffer).clone()
    }

    /// Connects to `url` and starts the receive loop.
    ///
    /// The outcome is reported through `on_connect`.  Calling this again
    /// stops the previous receive loop and closes the previous connection
    /// before the new one is opened, so a failed reconnect leaves nothing
    /// to send on.
    pub fn connect(&self, url: &str) {
        let url = url.to_string();
        let connector = Arc::clone(&self.connector);
        let handler = Arc::clone(&self.handler);
        let shared = Arc::clone(&self.shared);

        self.shared.set_state(SessionState::Connecting);
        debug!("session: connecting to {url}");

        let task = self.runtime.spawn(async move {
            let stale = shared.sink.lock().await.take();
            if let Some(mut stale) = stale {
                debug!("session: closing previous connection");
                if let Err(e) = stale.close().await {
                    debug!("session: previous connection did not close cleanly: {e}");
                }
            }

            match connector.connect(&url).await {
                Ok((sink, source)) => {
                    info!("session: connected to {url}");
                    *shared.sink.lock().await = Some(sink);
                    shared.set_state(SessionState::Connected);
                    handler.on_connect(&Ok(()));
                    receive_loop(source, &shared, handler.as_ref()).await;
                }
                Err(e) => {
                    warn!("session: connect to {url} failed: {e}");
                    shared.set_state(SessionState::Disconnected);
                    handler.on_connect(&Err(e));
                }
            }
        });

        if let Some(previous) = lock(&self.shared.receive_task).replace(task) {
            previous.abort();
        }
    }

    /// Starts closing the connection.  The outcome is reported through
    /// `on_disconnect`; with no open connection that is
    /// [`SessionError::NotConnected`].
    ///
    /// The returned handle resolves once the handler has been called.
    pub fn disconnect(&self) -> JoinHandle<()> {
        let handler = Arc::clone(&self.handler);
        let shared = Arc::clone(&self.shared);

        self.runtime.spawn(async move {
            let sink = shared.sink.lock().await.take();
            // Mark the teardown first so the receive loop stops delivering.
            shared.set_state(SessionState::Disconnected);
            let result = match sink {
                Some(mut sink) => sink.close().await,
                None => Err(SessionError::NotConnected),
            };
            match &result {
                Ok(()) => info!("session: disconnected"),
                Err(e) => warn!("session: disconnect failed: {e}"),
            }
            handler.on_disconnect(&result);
        })
    }

    /// Sends `message` as a text frame.  Sends are not queued behind each
    /// other; each one is its own task.  The outcome is reported through
    /// `on_send`.
    ///
    /// The returned handle resolves once the handler has been called.
    pub fn send(&self, message: impl Into<String>) -> JoinHandle<()> {
        let text = message.into();
        let handler = Arc::clone(&self.handler);
        let shared = Arc::clone(&self.shared);

        self.runtime.spawn(async move {
            let result = match shared.sink.lock().await.as_mut() {
                Some(sink) => sink.send_text(text).await,
                None => Err(SessionError::NotConnected),
            };
            if let Err(e) = &result {
                warn!("session: send failed: {e}");
            }
            handler.on_send(&result);
        })
    }
}

impl Drop for SessionChannel {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.shared.receive_task).take() {
            task.abort();
        }
    }
}

/// Awaits one frame at a time until a receive fails or the channel is
/// torn down.
async fn receive_loop(
    mut source: Box<dyn FrameSource>,
    shared: &Shared,
    handler: &dyn SessionHandler,
) {
    loop {
        if !shared.begin_receive() {
            debug!("session: receive loop stopped after disconnect");
            break;
        }

        let result = source.receive().await;
        if !shared.is_receiving() {
            debug!("session: dropping receive result that completed after disconnect");
            break;
        }

        match result {
            Ok(frame) if frame.opcode.is_control() => {
                debug!("session: skipping {:?} control frame", frame.opcode);
            }
            Ok(frame) => match frame.decode_text() {
                Ok(text) => {
                    debug!("session: received {:?} frame ({} bytes)", frame.opcode, text.len());
                    *lock(&shared.rx_buffer) = Some(text.clone());
                    handler.on_receive(&Ok(Received {
                        opcode: frame.opcode,
                        text,
                    }));
                }
                Err(e) => {
                    warn!("session: dropping undecodable {:?} frame: {e}", frame.opcode);
                }
            },
            Err(e) => {
                info!("session: receive loop stopped: {e}");
                shared.set_state(SessionState::Disconnected);
                shared.sink.lock().await.take();
                handler.on_receive(&Err(e));
                break;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
