//! Error types for the protocol layer.
//!
//! There are two kinds of "something went wrong" here, and they are kept
//! apart on purpose:
//!
//! - [`ProtocolError`] is for our own side going wrong: an encode failure,
//!   a registry built with clashing tags, an outbound message that breaks
//!   its own contract. These are returned as `Err` and callers propagate
//!   them with `?`.
//! - Inbound data that fails a check is not an error at all. It is routine
//!   on an open network boundary, so the codec turns it into `None` and
//!   logs the [`Rejection`](crate::codec::Rejection) reason at `debug`.

/// Errors that can occur in the protocol layer.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error` impl,
/// and each `#[error("...")]` attribute is the `Display` text you see
/// when the error is printed or logged.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound message to JSON text failed.
    ///
    /// The inner `serde_json::Error` is kept as the `source`, so error
    /// reporters that walk the chain still show what serde_json said.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Two variants were registered under the same wire tag.
    #[error("duplicate message tag: {0}")]
    DuplicateTag(&'static str),

    /// A numeric code that is not a declared member of its table, such as
    /// an `errorId` of 999.
    ///
    /// This is also the error serde reports when a `try_from` conversion
    /// refuses a code during decoding.
    #[error("{kind} has no member with code {code}")]
    UnknownCode { kind: &'static str, code: i64 },

    /// A message that breaks its own contract: a `RequestSignIn` whose
    /// name the peer would refuse, a `Hello` with the wrong identify
    /// string, a `null` player id.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_tag_display() {
        let err = ProtocolError::DuplicateTag("HeLlO");
        assert_eq!(err.to_string(), "duplicate message tag: HeLlO");
    }

    #[test]
    fn test_unknown_code_display() {
        let err = ProtocolError::UnknownCode {
            kind: "ErrorId",
            code: 999,
        };
        assert_eq!(err.to_string(), "ErrorId has no member with code 999");
    }

    #[test]
    fn test_invalid_message_display() {
        let err = ProtocolError::InvalidMessage("empty name".into());
        assert!(err.to_string().contains("empty name"));
    }
}
