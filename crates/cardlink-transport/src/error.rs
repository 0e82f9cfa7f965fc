/// Errors that can occur in the transport layer.
///
/// Every variant is terminal for the current connection: the adapter
/// retries nothing. Reconnection, if wanted, is the caller's job.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the WebSocket failed (DNS, TCP, or handshake).
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Sending a frame failed. The connection is force-closed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The connection is already closed.
    #[error("connection closed")]
    Closed,
}
