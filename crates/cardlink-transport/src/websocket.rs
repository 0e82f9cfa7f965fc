//! WebSocket client adapter built on `tokio-tungstenite`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{TransportError, TransportEvent};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Shared between the handle, the read task, and the send path.
///
/// `disconnect_sent` guards the one-`Disconnected`-per-connection
/// invariant: the read task, a failed send, and an explicit `disconnect`
/// can all race to report the end of the connection, but only the first
/// one emits.
struct Shared {
    sink: Mutex<SplitSink<WsStream, Message>>,
    events: mpsc::UnboundedSender<TransportEvent>,
    closed: AtomicBool,
    disconnect_sent: AtomicBool,
}

impl Shared {
    fn emit(&self, event: TransportEvent) {
        // Once Disconnected went out, the connection is over and nothing
        // further may reach the consumer. A dropped receiver means the
        // session is being torn down; nothing useful to do then either.
        if self.disconnect_sent.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.events.send(event);
    }

    fn emit_disconnected(&self) {
        if !self.disconnect_sent.swap(true, Ordering::SeqCst) {
            let _ = self.events.send(TransportEvent::Disconnected);
        }
    }
}

/// Entry point for opening a connection.
pub struct WsTransport;

impl WsTransport {
    /// Opens a WebSocket to `url` and spawns the read task.
    ///
    /// Returns the send handle and the event receiver. The first event on
    /// the receiver is always [`TransportEvent::Connected`].
    ///
    /// # Errors
    /// Returns [`TransportError::ConnectFailed`] if the TCP connection or
    /// the WebSocket handshake fails.
    pub async fn connect(
        url: &str,
    ) -> Result<
        (WsHandle, mpsc::UnboundedReceiver<TransportEvent>),
        TransportError,
    > {
        let (ws, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::info!(url, "WebSocket connected");

        let (sink, stream) = ws.split();
        let (tx, rx) = mpsc::unbounded_channel();

        let shared = Arc::new(Shared {
            sink: Mutex::new(sink),
            events: tx,
            closed: AtomicBool::new(false),
            disconnect_sent: AtomicBool::new(false),
        });

        shared.emit(TransportEvent::Connected);
        tokio::spawn(read_loop(stream, Arc::clone(&shared)));

        Ok((WsHandle { shared }, rx))
    }
}

/// Handle for the outbound half of a connection. Cheap to clone.
#[derive(Clone)]
pub struct WsHandle {
    shared: Arc<Shared>,
}

impl WsHandle {
    /// Sends one text frame.
    ///
    /// A failure is observable twice over: this returns
    /// [`TransportError::SendFailed`], AND the event stream sees
    /// `Error` followed by `Disconnected` — the connection is dead either
    /// way.
    ///
    /// # Errors
    /// [`TransportError::Closed`] if the connection was already torn
    /// down; [`TransportError::SendFailed`] if the socket rejects the
    /// frame.
    pub async fn send(&self, text: &str) -> Result<(), TransportError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }

        let result = {
            let mut sink = self.shared.sink.lock().await;
            sink.send(Message::Text(text.to_string().into())).await
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "send failed, closing connection");
            self.shared.closed.store(true, Ordering::SeqCst);
            self.shared.emit(TransportEvent::Error(e.to_string()));
            self.shared.emit_disconnected();
            let _ = self.shared.sink.lock().await.close().await;
            return Err(TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            )));
        }
        Ok(())
    }

    /// Closes the connection. Idempotent: repeated calls are no-ops.
    pub async fn disconnect(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("closing WebSocket");
        let _ = self.shared.sink.lock().await.close().await;
        self.shared.emit_disconnected();
    }

    /// Whether the connection has not been torn down yet.
    pub fn is_open(&self) -> bool {
        !self.shared.closed.load(Ordering::SeqCst)
    }
}

/// Forwards inbound frames to the event channel until the stream ends.
async fn read_loop(mut stream: SplitStream<WsStream>, shared: Arc<Shared>) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                shared.emit(TransportEvent::Received(text.to_string()));
            }
            Ok(Message::Binary(data)) => {
                // The protocol is text-only, but tolerate servers that
                // flag frames as binary, as long as they hold UTF-8.
                match String::from_utf8(data.to_vec()) {
                    Ok(text) => {
                        shared.emit(TransportEvent::Received(text));
                    }
                    Err(_) => {
                        tracing::warn!(
                            "dropping non-UTF-8 binary frame"
                        );
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/frame
            Err(e) => {
                tracing::debug!(error = %e, "receive error");
                shared.emit(TransportEvent::Error(e.to_string()));
                break;
            }
        }
    }

    shared.closed.store(true, Ordering::SeqCst);
    shared.emit_disconnected();
}
