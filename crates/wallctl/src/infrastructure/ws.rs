//! Persistent-channel transport built on `tokio-tungstenite`.
//!
//! [`TungsteniteConnector`] performs the WebSocket handshake and splits the
//! stream into a write half ([`FrameSink`]) and a read half
//! ([`FrameSource`]).  Everything above this module sees only [`Frame`]s and
//! [`SessionError`]s.
//!
//! Pings from the appliance are answered by tungstenite itself while the
//! read half is being polled.  Ping and pong still come out of this module
//! as frames with their opcode; the session's receive loop skips them.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::application::session::{FrameSink, FrameSource, SocketConnector};
use crate::domain::session::{Frame, Opcode, SessionError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket connections with `connect_async`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

#[async_trait]
impl SocketConnector for TungsteniteConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>), SessionError> {
        let (stream, response) =
            connect_async(url)
                .await
                .map_err(|e| SessionError::ConnectFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        debug!("websocket handshake with {url}: HTTP {}", response.status());

        // Split so sends never wait behind the outstanding receive.
        let (tx, rx) = stream.split();
        Ok((Box::new(WsSink { tx }), Box::new(WsSource { rx })))
    }
}

struct WsSink {
    tx: SplitSink<WsStream, WsMessage>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&mut self, text: String) -> Result<(), SessionError> {
        self.tx
            .send(WsMessage::Text(text))
            .await
            .map_err(session_error)
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.tx.close().await.map_err(session_error)
    }
}

struct WsSource {
    rx: SplitStream<WsStream>,
}

#[async_trait]
impl FrameSource for WsSource {
    async fn receive(&mut self) -> Result<Frame, SessionError> {
        match self.rx.next().await {
            Some(Ok(message)) => frame_from_message(message),
            Some(Err(e)) => Err(session_error(e)),
            None => Err(SessionError::Closed),
        }
    }
}

/// Maps one tungstenite message to a frame.  A close frame ends the
/// receive loop, so it is reported as [`SessionError::Closed`].
fn frame_from_message(message: WsMessage) -> Result<Frame, SessionError> {
    let (opcode, payload) = match message {
        WsMessage::Text(text) => (Opcode::Text, text.into_bytes()),
        WsMessage::Binary(bytes) => (Opcode::Binary, bytes),
        WsMessage::Ping(bytes) => (Opcode::Ping, bytes),
        WsMessage::Pong(bytes) => (Opcode::Pong, bytes),
        WsMessage::Close(frame) => {
            if let Some(frame) = frame {
                debug!("appliance closed the channel: {} {}", frame.code, frame.reason);
            }
            return Err(SessionError::Closed);
        }
        WsMessage::Frame(frame) => (Opcode::Continuation, frame.into_data()),
    };
    Ok(Frame { opcode, payload })
}

fn session_error(e: WsError) -> SessionError {
    match e {
        WsError::ConnectionClosed | WsError::AlreadyClosed => SessionError::Closed,
        other => SessionError::Io(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_maps_to_text_frame() {
        let frame = frame_from_message(WsMessage::Text("ping".to_string())).unwrap();
        assert_eq!(frame, Frame::text("ping"));
    }

    #[test]
    fn test_binary_and_control_messages_keep_their_opcode() {
        let binary = frame_from_message(WsMessage::Binary(vec![1, 2])).unwrap();
        assert_eq!(binary.opcode, Opcode::Binary);
        assert_eq!(binary.payload, vec![1, 2]);

        let ping = frame_from_message(WsMessage::Ping(vec![])).unwrap();
        assert_eq!(ping.opcode.code(), 9);

        let pong = frame_from_message(WsMessage::Pong(vec![])).unwrap();
        assert_eq!(pong.opcode.code(), 10);
    }

    #[test]
    fn test_close_message_ends_the_loop() {
        assert_eq!(
            frame_from_message(WsMessage::Close(None)),
            Err(SessionError::Closed)
        );
    }

    #[test]
    fn test_closed_errors_map_to_closed() {
        assert_eq!(session_error(WsError::ConnectionClosed), SessionError::Closed);
        assert_eq!(session_error(WsError::AlreadyClosed), SessionError::Closed);
        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(session_error(WsError::Io(reset)), SessionError::Io(_)));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let url = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            format!("ws://{}/1/sockets", listener.local_addr().unwrap())
        };

        let result = TungsteniteConnector.connect(&url).await;

        match result {
            Err(SessionError::ConnectFailed { url: failed, .. }) => assert_eq!(failed, url),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("connect should fail"),
        }
    }
}
