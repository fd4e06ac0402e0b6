//! Wire protocol for NuMaUcTiOn, a turn-based bidding card game.
//!
//! This crate defines every message the server and its clients exchange:
//!
//! - **Identifiers** ([`ErrorId`], [`ResultCode`], [`RequestId`],
//!   [`PlayerId`]): fixed numeric codes and opaque ids.
//! - **Value objects** ([`GameInfo`], [`Player`], [`MyPlayer`],
//!   [`WinnerCurrentTurn`], [`PlayerInfo`]): aggregates embedded in
//!   messages.
//! - **Messages** ([`Message`] and one struct per [`Variant`]): one type
//!   per protocol event, each with a unique wire tag.
//! - **Registry** ([`Registry`]): wire tag → parser.
//! - **Codec** ([`EnvelopeCodec`], [`Frame`]): transport frames to typed
//!   messages and back.
//!
//! # Architecture
//!
//! The crate sits between the transport (raw text frames) and the session
//! layer (who is connected, what phase they are in). It keeps no state and
//! does no I/O; everything here is safe to call from any thread.
//!
//! ```text
//! Transport ({data}) → Codec → Registry → Variant::parse → Message → Session
//! ```
//!
//! Inbound data is never an error. A frame that fails any check decodes to
//! `None` and the caller decides what to do about it.
//!
//! Every message and value object derives serde's `Serialize` and
//! `Deserialize`, so the wire shape is declared next to each struct with
//! `#[serde(...)]` attributes rather than written out by hand.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

// `mod` declares a submodule. `message` is a directory (`src/message/mod.rs`
// plus one file per protocol phase); the rest are single files. Only
// `codec` is `pub`, because callers use its free functions as
// `codec::decode_bytes(..)`. Everything else is reached through the
// re-exports below.

pub mod codec;
mod error;
mod game_info;
mod ids;
mod message;
mod plain;
mod registry;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// `pub use` lifts items to the crate root, so callers write
// `use numauction_protocol::RequestBid` without knowing which phase module
// it lives in.

pub use codec::{EnvelopeCodec, Frame, Rejection};
pub use error::ProtocolError;
pub use game_info::{cards, Card, GameInfo, MyPlayer, Player, WinnerCurrentTurn};
pub use ids::{ErrorId, PlayerId, RequestId, ResultCode, PLAYER_NAME_MAX_LENGTH};
pub use message::sign_in::is_valid_player_name;
pub use message::{
    matches_envelope, Direction, Error, FinishGame, FinishTurn, GameStart, HasRequestId, Hello,
    Message, ParseFn, Phase, PlayerInfo, RequestBid, RequestJoin, RequestReadyGame,
    RequestSignIn, ResponseBid, ResponseJoin, ResponseReadyGame, ResponseSignIn, StartTurn,
    UpdatePlayerBidStatus, UpdatePlayers, Variant, TYPE_FIELD,
};
pub use plain::{Fields, PlainObject};
pub use registry::{Registry, RegistryBuilder};
