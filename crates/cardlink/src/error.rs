//! Unified error type for the Cardlink engine.

use cardlink_protocol::ProtocolError;
use cardlink_transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// Callers of the engine deal with this single type; the `#[from]`
/// attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CardlinkError {
    /// A transport-level failure (connect, send). Terminal for the
    /// connection.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level failure (malformed envelope, unknown or
    /// out-of-place tag). Fatal for the offending message only.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The configured WebSocket endpoint is not a parseable URL.
    #[error("invalid WebSocket URL: {0}")]
    BadUrl(#[from] url::ParseError),

    /// A command was issued without a live connection. This is a
    /// precondition failure: correct integrations connect first.
    #[error("not connected to a game")]
    NotConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: CardlinkError = TransportError::Closed.into();
        assert!(matches!(err, CardlinkError::Transport(_)));
        assert_eq!(err.to_string(), "connection closed");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: CardlinkError = ProtocolError::UnknownType(9999).into();
        assert!(matches!(err, CardlinkError::Protocol(_)));
        assert!(err.to_string().contains("9999"));
    }
}
