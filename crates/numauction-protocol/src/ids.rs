//! Identifier types shared by every message: error and result codes,
//! request correlation ids, and opaque player ids.
//!
//! The numeric codes are the wire contract. New members are appended with
//! the next free value; existing values are never renumbered or reused.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::ProtocolError;

/// Longest accepted `playerName` in a sign-in request, in UTF-16 code units.
pub const PLAYER_NAME_MAX_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// ErrorId
// ---------------------------------------------------------------------------

/// Why the server rejected something, carried by the `Error` message.
///
/// Codes start at 0 and count down. On the wire an `ErrorId` is just its
/// code: `#[serde(try_from = "i64", into = "i64")]` tells serde to go
/// through the integer conversions below, so an undeclared code (or a
/// non-integer) fails to decode instead of producing a bogus member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ErrorId {
    /// Code 0.
    Unknown,
    /// Code -1. Something broke on the server side.
    ServerBug,
    /// Code -2. The client sent something the server could not use.
    InvalidMessage,
}

impl ErrorId {
    /// Every member, in declaration order. Append only.
    pub const ALL: [ErrorId; 3] = [Self::Unknown, Self::ServerBug, Self::InvalidMessage];

    /// The numeric wire code.
    pub const fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::ServerBug => -1,
            Self::InvalidMessage => -2,
        }
    }

    /// Looks up a member by wire code. `None` for undeclared codes.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.code() == code)
    }

    /// Returns `true` if `code` is a declared member.
    pub fn is_member(code: i64) -> bool {
        Self::from_code(code).is_some()
    }
}

impl TryFrom<i64> for ErrorId {
    type Error = ProtocolError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ProtocolError::UnknownCode {
            kind: "ErrorId",
            code,
        })
    }
}

impl From<ErrorId> for i64 {
    fn from(id: ErrorId) -> Self {
        id.code()
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::ServerBug => "serverBug",
            Self::InvalidMessage => "invalidMessage",
        };
        write!(f, "{name}({})", self.code())
    }
}

// ---------------------------------------------------------------------------
// ResultCode
// ---------------------------------------------------------------------------

/// Outcome of a bid, carried by `ResponseBid`. Same wire treatment as
/// [`ErrorId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ResultCode {
    /// Code 0. The bid was taken.
    Success,
    /// Code -1. The player already has a bid on the table this turn.
    AlreadyBid,
}

impl ResultCode {
    /// Every member, in declaration order. Append only.
    pub const ALL: [ResultCode; 2] = [Self::Success, Self::AlreadyBid];

    /// The numeric wire code.
    pub const fn code(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::AlreadyBid => -1,
        }
    }

    /// Looks up a member by wire code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|rc| rc.code() == code)
    }

    /// Returns `true` if `code` is a declared member.
    pub fn is_member(code: i64) -> bool {
        Self::from_code(code).is_some()
    }
}

impl TryFrom<i64> for ResultCode {
    type Error = ProtocolError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ProtocolError::UnknownCode {
            kind: "ResultCode",
            code,
        })
    }
}

impl From<ResultCode> for i64 {
    fn from(rc: ResultCode) -> Self {
        rc.code()
    }
}

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Correlates a request with the response that answers it.
///
/// The issuing side picks the value and the other side echoes it back.
/// Any JSON number is a valid id (`-1`, `1.5` and `1e2` included), so the
/// exact [`Number`] is kept rather than squeezed into a fixed-width
/// integer. `#[serde(transparent)]` puts the bare number on the wire:
/// `RequestId::new(7)` is just `7`, not `{ "0": 7 }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Number);

impl RequestId {
    /// The wire field name.
    pub const FIELD: &'static str = "requestId";

    pub fn new(id: u64) -> Self {
        Self(Number::from(id))
    }

    pub fn as_number(&self) -> &Number {
        &self.0
    }
}

impl From<Number> for RequestId {
    fn from(id: Number) -> Self {
        Self(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// An opaque player identifier.
///
/// The server decides what ids look like; the protocol only requires the
/// value to be non-null and comparable, so any JSON value is carried as is.
/// Serde goes through `Value` with `try_from`, which is where `null` is
/// refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct PlayerId(Value);

impl PlayerId {
    /// Wraps a JSON value. Returns `None` for `null`.
    pub fn new(value: impl Into<Value>) -> Option<Self> {
        Self::try_from(value.into()).ok()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl TryFrom<Value> for PlayerId {
    type Error = ProtocolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Err(ProtocolError::InvalidMessage("player id is null".into())),
            value => Ok(Self(value)),
        }
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(Value::from(id))
    }
}

impl From<PlayerId> for Value {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Strings print bare, anything else prints as JSON.
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}
