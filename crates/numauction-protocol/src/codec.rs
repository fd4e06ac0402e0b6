//! Envelope codec: transport frames in, typed messages out, and back.
//!
//! The transport carries each message double-encoded. The frame is an
//! object with a single string field `data`, and that string is the JSON
//! text of the payload object:
//!
//! ```text
//! frame:   { "data": "{\"type\":\"HeLlO\",\"identify\":\"...\"}" }
//! payload: { "type": "HeLlO", "identify": "..." }
//! ```
//!
//! Decoding is total. Whatever arrives, the result is either a message or
//! `None`. Every public `decode*` method funnels into one private
//! `try_decode*` chain that returns `Result<Message, Rejection>`, and the
//! rejection reason is logged once at `debug` before being turned into
//! `None` with `.ok()`.
//!
//! ## Example
//!
//! ```rust
//! use numauction_protocol::{codec, Hello, Message};
//!
//! let frame = codec::encode_frame(&Hello.into()).unwrap();
//! assert_eq!(frame.data, r#"{"type":"HeLlO","identify":"WeLcOmE NuMaUcTiOn SeRvEr"}"#);
//!
//! let decoded = codec::decode_frame(&frame);
//! assert_eq!(decoded, Some(Message::Hello(Hello)));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;
use crate::registry::Registry;
use crate::ProtocolError;

/// Why an inbound frame was dropped.
///
/// This is not a [`ProtocolError`]: a peer sending junk is routine, so
/// callers of the codec only ever see `None`. The reason exists for the
/// `debug` log line and for tests.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// The frame is not an object with a string `data` field.
    #[error("frame has no data string")]
    NoData,

    #[error("frame is not JSON: {0}")]
    FrameNotJson(#[source] serde_json::Error),

    /// `data` held text that is not JSON.
    #[error("payload is not JSON: {0}")]
    PayloadNotJson(#[source] serde_json::Error),

    /// The payload has no non-empty string `type`.
    #[error("payload has no type")]
    MissingType,

    /// The registry has nothing under this tag.
    #[error("unknown type {0:?}")]
    UnknownType(String),

    /// The tag is known but the variant's own check failed.
    ///
    /// `source` is serde's explanation, e.g. a missing field or an
    /// undeclared `errorId`.
    #[error("{tag} failed its check: {source}")]
    Malformed {
        tag: &'static str,
        source: serde_json::Error,
    },
}

/// The outer transport frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// The payload, as JSON text.
    pub data: String,
}

impl Frame {
    /// Pulls the `data` string out of an untyped frame. Any other shape
    /// yields `None`.
    pub fn from_value(frame: &Value) -> Option<Self> {
        let data = frame.get("data")?.as_str()?;
        Some(Self { data: data.to_owned() })
    }
}

/// Decodes and encodes frames through a given [`Registry`].
///
/// ## Lifetimes
///
/// `EnvelopeCodec<'r>` borrows its registry for `'r`. It holds only that
/// shared reference, so it is `Copy` and can be used from any number of
/// threads at once. `EnvelopeCodec<'static>` (the [`Default`]) borrows the
/// process-wide standard registry, which lives forever.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeCodec<'r> {
    registry: &'r Registry,
}

impl Default for EnvelopeCodec<'static> {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}

impl<'r> EnvelopeCodec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Decodes an untyped frame object.
    pub fn decode(&self, frame: &Value) -> Option<Message> {
        accept(self.try_decode(frame))
    }

    pub fn decode_frame(&self, frame: &Frame) -> Option<Message> {
        accept(self.try_decode_data(&frame.data))
    }

    /// Decodes a raw frame as delivered by the transport, e.g. the text of
    /// a websocket message.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Option<Message> {
        accept(self.try_decode_bytes(bytes))
    }

    /// Decodes the payload JSON text carried in a frame's `data` field.
    pub fn decode_data(&self, data: &str) -> Option<Message> {
        accept(self.try_decode_data(data))
    }

    fn try_decode_bytes(&self, bytes: &[u8]) -> Result<Message, Rejection> {
        let frame: Value = serde_json::from_slice(bytes).map_err(Rejection::FrameNotJson)?;
        self.try_decode(&frame)
    }

    fn try_decode(&self, frame: &Value) -> Result<Message, Rejection> {
        let frame = Frame::from_value(frame).ok_or(Rejection::NoData)?;
        self.try_decode_data(&frame.data)
    }

    fn try_decode_data(&self, data: &str) -> Result<Message, Rejection> {
        // `?` converts the serde error into a rejection through `map_err`
        // and returns early; on success `payload` is the parsed object.
        let payload: Value = serde_json::from_str(data).map_err(Rejection::PayloadNotJson)?;
        self.registry.dispatch(&payload)
    }

    /// Serializes a message to the payload JSON text.
    ///
    /// `Message` derives `Serialize` as an internally tagged enum, so this
    /// is a plain `serde_json::to_string` with `type` written first.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if `serde_json` fails to write the
    /// payload.
    pub fn encode(&self, message: &Message) -> Result<String, ProtocolError> {
        let data = serde_json::to_string(message).map_err(ProtocolError::Encode)?;
        tracing::trace!(tag = message.tag(), %data, "encoded outbound message");
        Ok(data)
    }

    /// Like [`encode`](Self::encode), but first checks that the peer would
    /// accept the message, so a bad outbound value fails here instead of
    /// being silently dropped on the other side.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` if the message does not pass
    /// its own structural check.
    pub fn encode_checked(&self, message: &Message) -> Result<String, ProtocolError> {
        let plain = serde_json::to_value(message).map_err(ProtocolError::Encode)?;
        Message::deserialize(&plain).map_err(|e| {
            ProtocolError::InvalidMessage(format!("{}: {e}", message.tag()))
        })?;
        self.encode(message)
    }

    /// Serializes a message into a transport frame.
    pub fn encode_frame(&self, message: &Message) -> Result<Frame, ProtocolError> {
        self.encode(message).map(|data| Frame { data })
    }
}

/// Logs the reason for a rejected frame and drops it.
fn accept(result: Result<Message, Rejection>) -> Option<Message> {
    result
        .inspect_err(|reason| tracing::debug!(%reason, "rejected inbound frame"))
        .ok()
}

// ---------------------------------------------------------------------------
// Free functions over the standard registry
// ---------------------------------------------------------------------------

/// Decodes an untyped frame object with the standard registry.
pub fn decode(frame: &Value) -> Option<Message> {
    EnvelopeCodec::default().decode(frame)
}

pub fn decode_frame(frame: &Frame) -> Option<Message> {
    EnvelopeCodec::default().decode_frame(frame)
}

pub fn decode_bytes(bytes: &[u8]) -> Option<Message> {
    EnvelopeCodec::default().decode_bytes(bytes)
}

pub fn decode_data(data: &str) -> Option<Message> {
    EnvelopeCodec::default().decode_data(data)
}

/// Serializes a message to the payload JSON text.
pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    EnvelopeCodec::default().encode(message)
}

pub fn encode_frame(message: &Message) -> Result<Frame, ProtocolError> {
    EnvelopeCodec::default().encode_frame(message)
}
