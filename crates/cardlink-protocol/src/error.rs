//! Error types for the protocol layer.
//!
//! Each crate in Cardlink defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in the envelope or a payload
//! shape, not in networking or state reconciliation.

/// Errors that can occur while encoding or decoding wire messages.
///
/// All three variants are fatal *for the current message only*: the host
/// decides whether to log and continue or to tear down the session.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The text frame is not a well-formed envelope, or the `data` object
    /// does not match the shape its tag promises.
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The envelope carried a type tag outside the enumerated protocol set.
    #[error("unknown message type tag {0}")]
    UnknownType(u32),

    /// A well-formed message whose tag is client→server only arrived on
    /// the inbound path. The server never sends these; receiving one means
    /// the peer is not speaking the protocol.
    #[error("client-only message type tag {0} received from server")]
    UnexpectedClientMessage(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message_names_the_tag() {
        let err = ProtocolError::UnknownType(9999);
        assert!(err.to_string().contains("9999"));
    }

    #[test]
    fn test_malformed_wraps_serde_error() {
        let serde_err =
            serde_json::from_str::<u32>("not json").unwrap_err();
        let err = ProtocolError::Malformed(serde_err);
        assert!(err.to_string().starts_with("malformed message"));
    }
}
