//! In-game messages: bids, bid status broadcasts, and the turn snapshots.
//!
//! The protocol only carries outcomes. Whether a bid is legal or who wins a
//! turn is decided by the game engine behind the server.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::HasRequestId;
use crate::game_info::{Card, GameInfo};
use crate::ids::{PlayerId, RequestId, ResultCode};

// ---------------------------------------------------------------------------
// RequestBid / ResponseBid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBid {
    pub request_id: RequestId,
    /// The turn the bid is meant for. Lets the server drop stale bids.
    pub turn_num: Number,
    pub bid_card: Card,
}

impl RequestBid {
    pub fn new(request_id: RequestId, turn_num: impl Into<Number>, bid_card: impl Into<Card>) -> Self {
        Self {
            request_id,
            turn_num: turn_num.into(),
            bid_card: bid_card.into(),
        }
    }
}

impl HasRequestId for RequestBid {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBid {
    pub request_id: RequestId,
    pub result_code: ResultCode,
}

impl ResponseBid {
    pub fn new(request_id: RequestId, result_code: ResultCode) -> Self {
        Self {
            request_id,
            result_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result_code == ResultCode::Success
    }
}

impl HasRequestId for ResponseBid {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// UpdatePlayerBidStatus
// ---------------------------------------------------------------------------

/// Broadcast when a player has placed a bid. Says who, never which card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerBidStatus {
    pub turn_num: Number,
    pub player_id: PlayerId,
}

impl UpdatePlayerBidStatus {
    pub fn new(turn_num: impl Into<Number>, player_id: impl Into<PlayerId>) -> Self {
        Self {
            turn_num: turn_num.into(),
            player_id: player_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Turn snapshots
// ---------------------------------------------------------------------------

/// A new turn begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTurn {
    pub game_info: GameInfo,
}

impl StartTurn {
    pub fn new(game_info: GameInfo) -> Self {
        Self { game_info }
    }
}

/// Every bid is in; bids are revealed and the turn's winner is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishTurn {
    pub game_info: GameInfo,
}

impl FinishTurn {
    pub fn new(game_info: GameInfo) -> Self {
        Self { game_info }
    }
}

/// The last turn is done. Carries the final standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishGame {
    pub game_info: GameInfo,
}

impl FinishGame {
    pub fn new(game_info: GameInfo) -> Self {
        Self { game_info }
    }
}
