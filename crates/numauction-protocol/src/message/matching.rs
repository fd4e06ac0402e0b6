//! Matchmaking: joining the roster, roster broadcasts, readying up, and the
//! game start that ends the phase.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use super::HasRequestId;
use crate::game_info::GameInfo;
use crate::ids::{PlayerId, RequestId};
use crate::plain::{non_empty_string, PlainObject};

// ---------------------------------------------------------------------------
// PlayerInfo
// ---------------------------------------------------------------------------

/// A roster entry during matchmaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: PlayerId,
    #[serde(deserialize_with = "non_empty_string")]
    pub name: String,
    /// Marks the entry describing the receiving client. Omitted from the
    /// wire when `None`; an absent key and `null` both read as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_self: Option<bool>,
}

impl PlayerInfo {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_self: None,
        }
    }

    /// Sets the self flag.
    pub fn with_self(mut self, is_self: bool) -> Self {
        self.is_self = Some(is_self);
        self
    }
}

impl PlainObject for PlayerInfo {}

// ---------------------------------------------------------------------------
// RequestJoin / ResponseJoin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestJoin {
    pub request_id: RequestId,
}

impl RequestJoin {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

impl HasRequestId for RequestJoin {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

/// Answers a join request. A denied join always carries an empty roster on
/// the wire, whatever `players` holds locally.
///
/// Reading is derived. Writing is by hand so the roster goes through
/// [`visible_players`](Self::visible_players).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseJoin {
    pub request_id: RequestId,
    pub allow: bool,
    pub players: Vec<PlayerInfo>,
}

impl ResponseJoin {
    pub fn allowed(request_id: RequestId, players: Vec<PlayerInfo>) -> Self {
        Self {
            request_id,
            allow: true,
            players,
        }
    }

    pub fn denied(request_id: RequestId) -> Self {
        Self {
            request_id,
            allow: false,
            players: Vec::new(),
        }
    }

    /// The roster as sent: empty when the join was denied.
    pub fn visible_players(&self) -> &[PlayerInfo] {
        if self.allow { &self.players[..] } else { &[] }
    }
}

impl Serialize for ResponseJoin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResponseJoin", 3)?;
        state.serialize_field(RequestId::FIELD, &self.request_id)?;
        state.serialize_field("allow", &self.allow)?;
        state.serialize_field("players", self.visible_players())?;
        state.end()
    }
}

impl HasRequestId for ResponseJoin {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// UpdatePlayers
// ---------------------------------------------------------------------------

/// Roster broadcast, sent whenever someone joins or leaves matchmaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlayers {
    pub players: Vec<PlayerInfo>,
}

impl UpdatePlayers {
    pub fn new(players: Vec<PlayerInfo>) -> Self {
        Self { players }
    }
}

// ---------------------------------------------------------------------------
// RequestReadyGame / ResponseReadyGame
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestReadyGame {
    pub request_id: RequestId,
}

impl RequestReadyGame {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

impl HasRequestId for RequestReadyGame {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReadyGame {
    pub request_id: RequestId,
}

impl ResponseReadyGame {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

impl HasRequestId for ResponseReadyGame {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// GameStart
// ---------------------------------------------------------------------------

/// Matchmaking is over; carries the opening snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    pub game_info: GameInfo,
}

impl GameStart {
    pub fn new(game_info: GameInfo) -> Self {
        Self { game_info }
    }
}
