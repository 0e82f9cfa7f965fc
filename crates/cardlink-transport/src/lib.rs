//! Client transport adapter for Cardlink.
//!
//! Wraps a raw WebSocket behind [`WsTransport::connect`], which yields a
//! [`WsHandle`] for the outbound direction (`send`, `disconnect`) and an
//! ordered stream of [`TransportEvent`]s for the inbound one. The adapter
//! owns no game semantics: it moves text frames and reports connection
//! lifecycle, nothing else.
//!
//! Events are delivered over a channel rather than assignable callback
//! fields so that registering a listener can never silently overwrite a
//! previous one, and so the consumer task observes frames strictly in
//! arrival order.
//!
//! There is no retry logic anywhere in this crate. A failed send or a
//! socket-level error is terminal for the current connection; the caller
//! reconnects by calling [`WsTransport::connect`] again, which supersedes
//! any previous handle.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsHandle, WsTransport};

/// Connection lifecycle and inbound data, in arrival order.
///
/// Exactly one `Connected` is emitted per successful connect, and at most
/// one `Disconnected` per connection, always last. `Error` precedes the
/// `Disconnected` it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The socket is open.
    Connected,
    /// A text frame arrived.
    Received(String),
    /// The connection ended — cleanly or not. Terminal.
    Disconnected,
    /// A socket-level failure. Followed by `Disconnected`.
    Error(String),
}
