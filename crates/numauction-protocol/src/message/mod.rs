//! Protocol messages.
//!
//! Each message type is a plain struct that derives serde and implements
//! [`Variant`]: a wire tag, the phase and direction it belongs to. Request
//! and response pairs also implement [`HasRequestId`]. All of them are
//! collected in the [`Message`] sum type that the codec hands to callers.
//!
//! Every payload on the wire is a JSON object with `type` first:
//!
//! ```text
//! { "type": "ReQsIgNiN", "requestId": 1, "playerName": "Alice" }
//! ```
//!
//! `Message` is an internally tagged serde enum (`#[serde(tag = "type")]`),
//! so that `type` key is written by serde itself, ahead of the variant's own
//! fields.
//!
//! A connection normally walks through the phases in order
//! (handshake → sign-in → matching → game), but nothing in this module
//! enforces that. Each message is checked on its own.

pub mod game;
pub mod handshake;
pub mod matching;
pub mod sign_in;

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::RequestId;
use crate::plain::Fields;

pub use game::{FinishGame, FinishTurn, RequestBid, ResponseBid, StartTurn, UpdatePlayerBidStatus};
pub use handshake::{Error, Hello};
pub use matching::{
    GameStart, PlayerInfo, RequestJoin, RequestReadyGame, ResponseJoin, ResponseReadyGame,
    UpdatePlayers,
};
pub use sign_in::{RequestSignIn, ResponseSignIn};

/// The payload field holding the wire tag.
pub const TYPE_FIELD: &str = "type";

// ---------------------------------------------------------------------------
// Phase / Direction
// ---------------------------------------------------------------------------

/// The protocol stage a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The server greets the connection, or reports an error.
    Handshake,
    /// The client names itself.
    SignIn,
    /// Roster building and ready-up, ending with `GameStart`.
    Matching,
    /// Bidding turns, up to `FinishGame`.
    Game,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handshake => write!(f, "handshake"),
            Self::SignIn => write!(f, "sign-in"),
            Self::Matching => write!(f, "matching"),
            Self::Game => write!(f, "game"),
        }
    }
}

/// Which peer sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Responses, broadcasts and snapshots.
    ServerToClient,
    /// Requests.
    ClientToServer,
}

// ---------------------------------------------------------------------------
// Variant / HasRequestId
// ---------------------------------------------------------------------------

/// One concrete message type, identified by a unique wire tag.
///
/// The serde derive on each struct describes its fields; this trait adds
/// the envelope around them. The constants are filled in by the table at
/// the bottom of this module, which is also where the `Message` variants
/// get their `#[serde(rename = ...)]`, so a tag is written exactly once.
pub trait Variant: Serialize + DeserializeOwned + Into<Message> {
    /// The wire tag. Unique across the registry.
    const TAG: &'static str;
    const PHASE: Phase;
    const DIRECTION: Direction;

    /// `{ "type": TAG, ...fields }`
    fn to_plain(&self) -> Value {
        let mut plain = Fields::new();
        plain.insert(TYPE_FIELD.into(), Value::from(Self::TAG));
        // Every key is a string, so serde_json cannot refuse these types.
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            plain.extend(fields);
        }
        Value::Object(plain)
    }

    /// Like [`parse`](Self::parse), but says why the candidate was refused.
    ///
    /// # Errors
    /// Returns the serde error for a wrong envelope tag or a field that
    /// fails its check.
    fn try_parse(candidate: &Value) -> Result<Self, serde_json::Error> {
        if !matches_envelope(candidate, Self::TAG) {
            return Err(serde_json::Error::custom(format_args!(
                "expected an object with type {:?}",
                Self::TAG
            )));
        }
        Self::deserialize(candidate)
    }

    /// Builds an instance iff `candidate` carries this variant's tag and
    /// every field checks out.
    fn parse(candidate: &Value) -> Option<Self> {
        Self::try_parse(candidate).ok()
    }

    fn is_valid(candidate: &Value) -> bool {
        Self::parse(candidate).is_some()
    }
}

/// Variants that correlate with a request on the issuing side.
pub trait HasRequestId {
    fn request_id(&self) -> &RequestId;
}

/// Returns `true` iff `candidate` is an object whose `type` is the string
/// `expected_tag`.
pub fn matches_envelope(candidate: &Value, expected_tag: &str) -> bool {
    candidate
        .as_object()
        .and_then(|fields| fields.get(TYPE_FIELD))
        .and_then(Value::as_str)
        .is_some_and(|tag| tag == expected_tag)
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Parses a plain candidate into the sum type.
pub type ParseFn = fn(&Value) -> Result<Message, serde_json::Error>;

/// [`Variant::try_parse`] lifted into [`Message`].
pub(crate) fn parse_into<V: Variant>(candidate: &Value) -> Result<Message, serde_json::Error> {
    V::try_parse(candidate).map(Into::into)
}

macro_rules! messages {
    ($($name:ident => $tag:tt, $phase:ident, $direction:ident;)+) => {
        $(
            impl Variant for $name {
                const TAG: &'static str = $tag;
                const PHASE: Phase = Phase::$phase;
                const DIRECTION: Direction = Direction::$direction;
            }

            impl From<$name> for Message {
                fn from(m: $name) -> Self {
                    Self::$name(m)
                }
            }
        )+

        /// Any protocol message.
        ///
        /// Serializing a `Message` with serde gives exactly the payload
        /// object, tag first. Deserializing one accepts any built-in tag;
        /// the codec goes through a [`Registry`](crate::Registry) instead so
        /// a peer can narrow what it accepts.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum Message {
            $(
                #[serde(rename = $tag)]
                $name($name),
            )+
        }

        impl Message {
            /// The wire tag of the wrapped variant.
            pub fn tag(&self) -> &'static str {
                match self {
                    $(Self::$name(_) => $name::TAG,)+
                }
            }

            pub fn phase(&self) -> Phase {
                match self {
                    $(Self::$name(_) => $name::PHASE,)+
                }
            }

            pub fn direction(&self) -> Direction {
                match self {
                    $(Self::$name(_) => $name::DIRECTION,)+
                }
            }

            /// The exact object placed on the wire.
            pub fn to_plain(&self) -> Value {
                match self {
                    $(Self::$name(m) => m.to_plain(),)+
                }
            }
        }

        /// Every built-in variant with its tag and direction.
        pub(crate) const STANDARD_VARIANTS: &[(&str, Direction, ParseFn)] = &[
            $(($tag, Direction::$direction, parse_into::<$name>),)+
        ];
    };
}

messages! {
    Hello => "HeLlO", Handshake, ServerToClient;
    Error => "ErRoR", Handshake, ServerToClient;
    RequestSignIn => "ReQsIgNiN", SignIn, ClientToServer;
    ResponseSignIn => "ReSsIgNiN", SignIn, ServerToClient;
    RequestJoin => "MaTcH_ReQjOiN", Matching, ClientToServer;
    ResponseJoin => "MaTcH_ReSjOiN", Matching, ServerToClient;
    UpdatePlayers => "MaTcH_UpDaTePlaYeRs", Matching, ServerToClient;
    RequestReadyGame => "MaTcH_ReQrEaDy", Matching, ClientToServer;
    ResponseReadyGame => "MaTcH_ReSrEaDy", Matching, ServerToClient;
    GameStart => "MaTcH_GaMeStArT", Matching, ServerToClient;
    RequestBid => "GaMe_ReQbId", Game, ClientToServer;
    ResponseBid => "GaMe_ReSbId", Game, ServerToClient;
    UpdatePlayerBidStatus => "GaMe_UpDaTePlAyErBiD", Game, ServerToClient;
    StartTurn => "GaMe_StArTtUrN", Game, ServerToClient;
    FinishTurn => "GaMe_FiNiShTuRn", Game, ServerToClient;
    FinishGame => "GaMe_FiNiShGaMe", Game, ServerToClient;
}

impl Message {
    /// The correlation id, for request and response variants.
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Self::RequestSignIn(m) => Some(m.request_id()),
            Self::ResponseSignIn(m) => Some(m.request_id()),
            Self::RequestJoin(m) => Some(m.request_id()),
            Self::ResponseJoin(m) => Some(m.request_id()),
            Self::RequestReadyGame(m) => Some(m.request_id()),
            Self::ResponseReadyGame(m) => Some(m.request_id()),
            Self::RequestBid(m) => Some(m.request_id()),
            Self::ResponseBid(m) => Some(m.request_id()),
            _ => None,
        }
    }

    /// Returns `true` if `self` is the response variant paired with
    /// `request`'s variant and both carry the same request id.
    pub fn is_response_to(&self, request: &Message) -> bool {
        let paired = matches!(
            (self, request),
            (Self::ResponseSignIn(_), Self::RequestSignIn(_))
                | (Self::ResponseJoin(_), Self::RequestJoin(_))
                | (Self::ResponseReadyGame(_), Self::RequestReadyGame(_))
                | (Self::ResponseBid(_), Self::RequestBid(_))
        );
        paired && self.request_id() == request.request_id()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.request_id() {
            Some(id) => write!(f, "{} ({id})", self.tag()),
            None => f.write_str(self.tag()),
        }
    }
}
