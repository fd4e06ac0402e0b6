//! Game snapshot types embedded in `GameStart`, `StartTurn`, `FinishTurn`
//! and `FinishGame`.
//!
//! The server builds a fresh [`GameInfo`] for each of those messages. The
//! receiver rebuilds its own copy from the plain representation, so nothing
//! mutable is shared across the wire.
//!
//! ```text
//! GameInfo
//! ├── turnNum
//! ├── myPlayer: MyPlayer  (Player + private hand)
//! ├── players: [Player]
//! ├── isBidCardOpen
//! └── winnerCurrentTurn: WinnerCurrentTurn | null
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::ids::PlayerId;
use crate::plain::{non_empty_string, required_nullable, PlainObject};

/// A card value. Hands, point piles and bids are all lists of these.
///
/// Any JSON number is a card; the protocol does not narrow it.
pub type Card = Number;

/// Builds a list of cards from anything convertible to a JSON number.
///
/// ```rust
/// use numauction_protocol::cards;
///
/// let hand = cards([1, 2, 3]);
/// assert_eq!(hand.len(), 3);
/// ```
pub fn cards<C: Into<Card>>(values: impl IntoIterator<Item = C>) -> Vec<Card> {
    values.into_iter().map(Into::into).collect()
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The public view of a player, as every participant sees it.
///
/// `name` is non-empty here. Its upper bound is only checked on
/// `RequestSignIn`, which is where names enter the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(deserialize_with = "non_empty_string")]
    pub name: String,
    /// Point cards won so far, in the order they were won.
    pub point_cards: Vec<Card>,
    /// Cards already spent on bids.
    pub used_cards: Vec<Card>,
    /// The card bid this turn. `None` until the player bids; always written,
    /// as `null` when unset.
    #[serde(deserialize_with = "required_nullable")]
    pub bid_card: Option<Card>,
}

impl Player {
    /// A player at the start of a game: no cards won, used, or bid.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            point_cards: Vec::new(),
            used_cards: Vec::new(),
            bid_card: None,
        }
    }

    pub fn has_bid(&self) -> bool {
        self.bid_card.is_some()
    }
}

impl PlainObject for Player {}

// ---------------------------------------------------------------------------
// MyPlayer
// ---------------------------------------------------------------------------

/// The receiving client's own player, including the private hand.
///
/// Only ever sent to the client it describes. That pairing is the session
/// layer's guarantee; nothing here compares `id` with the connection.
///
/// `#[serde(flatten)]` writes the `Player` fields at the same level as
/// `myCards`, and on the way back the whole `Player` contract runs before
/// `myCards` is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPlayer {
    #[serde(flatten)]
    pub player: Player,
    /// Cards still in hand.
    pub my_cards: Vec<Card>,
}

impl MyPlayer {
    pub fn new(player: Player, my_cards: Vec<Card>) -> Self {
        Self { player, my_cards }
    }

    /// The public part, as other participants see this player.
    pub fn as_player(&self) -> &Player {
        &self.player
    }
}

impl PlainObject for MyPlayer {}

// ---------------------------------------------------------------------------
// WinnerCurrentTurn
// ---------------------------------------------------------------------------

/// Outcome of a decided turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerCurrentTurn {
    pub is_draw: bool,
    /// Empty on a draw.
    pub player_name: String,
}

impl WinnerCurrentTurn {
    pub fn draw() -> Self {
        Self {
            is_draw: true,
            player_name: String::new(),
        }
    }

    pub fn winner(player_name: impl Into<String>) -> Self {
        Self {
            is_draw: false,
            player_name: player_name.into(),
        }
    }
}

impl PlainObject for WinnerCurrentTurn {}

// ---------------------------------------------------------------------------
// GameInfo
// ---------------------------------------------------------------------------

/// A full snapshot of the game from one client's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    /// Turn counter, starting at 1.
    pub turn_num: Number,
    pub my_player: MyPlayer,
    /// Every participant. The receiving player appears here too, in its
    /// public form.
    pub players: Vec<Player>,
    /// Whether this turn's bids have been revealed.
    pub is_bid_card_open: bool,
    /// `None` while the turn is undecided. The key itself is required.
    #[serde(deserialize_with = "required_nullable")]
    pub winner_current_turn: Option<WinnerCurrentTurn>,
}

impl GameInfo {
    /// A snapshot for the first turn, bids hidden, no winner yet.
    pub fn new(my_player: MyPlayer, players: Vec<Player>) -> Self {
        Self {
            turn_num: Number::from(1),
            my_player,
            players,
            is_bid_card_open: false,
            winner_current_turn: None,
        }
    }

    /// Looks up a participant by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Returns `true` once every participant has a bid on the table.
    pub fn all_bids_placed(&self) -> bool {
        self.players.iter().all(Player::has_bid)
    }
}

impl PlainObject for GameInfo {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn alice() -> Player {
        Player {
            id: PlayerId::from(1u64),
            name: "Alice".into(),
            point_cards: cards([5, -2]),
            used_cards: cards([3]),
            bid_card: Some(Card::from(7)),
        }
    }

    fn sample_game_info() -> GameInfo {
        let me = MyPlayer::new(alice(), cards([1, 2, 4]));
        let bob = Player::new(2u64, "Bob");
        GameInfo {
            turn_num: Number::from(3),
            players: vec![alice(), bob],
            my_player: me,
            is_bid_card_open: true,
            winner_current_turn: Some(WinnerCurrentTurn::winner("Alice")),
        }
    }

    // =====================================================================
    // Player
    // =====================================================================

    #[test]
    fn test_player_plain_shape() {
        let plain = alice().to_plain();
        assert_eq!(
            plain,
            json!({
                "id": 1,
                "name": "Alice",
                "pointCards": [5, -2],
                "usedCards": [3],
                "bidCard": 7,
            })
        );
    }

    #[test]
    fn test_player_without_bid_serializes_null() {
        let plain = Player::new("p-9", "Zed").to_plain();
        assert!(plain["bidCard"].is_null());
        assert_eq!(plain["pointCards"], json!([]));
    }

    #[test]
    fn test_player_accepts_null_bid_but_requires_the_key() {
        let mut plain = Player::new(1u64, "A").to_plain();
        assert!(Player::is_valid(&plain));

        plain.as_object_mut().unwrap().remove("bidCard");
        assert!(!Player::is_valid(&plain));
    }

    #[test]
    fn test_player_rejects_null_id_and_empty_name() {
        let mut plain = alice().to_plain();
        plain["id"] = Value::Null;
        assert!(!Player::is_valid(&plain));

        let mut plain = alice().to_plain();
        plain.as_object_mut().unwrap().remove("id");
        assert!(!Player::is_valid(&plain));

        let mut plain = alice().to_plain();
        plain["name"] = json!("");
        assert!(!Player::is_valid(&plain));
    }

    #[test]
    fn test_player_rejects_non_numeric_cards() {
        let mut plain = alice().to_plain();
        plain["usedCards"] = json!([1, null]);
        assert!(!Player::is_valid(&plain));
    }

    #[test]
    fn test_player_cards_take_any_json_number() {
        let plain: Value = serde_json::from_str(
            r#"{"id":1,"name":"A","pointCards":[-4,2.5],"usedCards":[1e2],"bidCard":3.0}"#,
        )
        .unwrap();
        let player = Player::from_plain(&plain).expect("fractional and exponent cards are numbers");
        assert_eq!(player.point_cards[1].as_f64(), Some(2.5));
        assert_eq!(player.used_cards[0].as_f64(), Some(100.0));
        assert_eq!(player.bid_card.and_then(|c| c.as_f64()), Some(3.0));
    }

    #[test]
    fn test_player_does_not_check_name_upper_bound() {
        let long = "x".repeat(200);
        let plain = Player::new(1u64, long.clone()).to_plain();
        assert_eq!(Player::from_plain(&plain).unwrap().name, long);
    }

    #[test]
    fn test_player_rejects_scalars() {
        assert!(!Player::is_valid(&Value::Null));
        assert!(!Player::is_valid(&json!([1, 2])));
        assert!(!Player::is_valid(&json!("Alice")));
    }

    // =====================================================================
    // MyPlayer
    // =====================================================================

    #[test]
    fn test_my_player_extends_player_shape() {
        let me = MyPlayer::new(alice(), cards([9, 10]));
        let plain = me.to_plain();
        assert_eq!(plain["myCards"], json!([9, 10]));
        assert_eq!(plain["name"], "Alice");
        // The public view is still a valid Player.
        assert!(Player::is_valid(&plain));
        assert_eq!(MyPlayer::from_plain(&plain), Some(me));
    }

    #[test]
    fn test_my_player_requires_my_cards() {
        let plain = alice().to_plain();
        assert!(!MyPlayer::is_valid(&plain));
    }

    #[test]
    fn test_my_player_base_check_is_not_bypassed() {
        let mut plain = MyPlayer::new(alice(), cards([1])).to_plain();
        plain["name"] = json!(42);
        assert!(!MyPlayer::is_valid(&plain));

        let mut plain = MyPlayer::new(alice(), cards([1])).to_plain();
        plain.as_object_mut().unwrap().remove("bidCard");
        assert!(!MyPlayer::is_valid(&plain));
    }

    // =====================================================================
    // WinnerCurrentTurn
    // =====================================================================

    #[test]
    fn test_winner_current_turn_draw_has_empty_name() {
        let draw = WinnerCurrentTurn::draw();
        assert_eq!(draw.to_plain(), json!({"isDraw": true, "playerName": ""}));
    }

    #[test]
    fn test_winner_current_turn_reads_its_own_fields() {
        let plain = json!({"isDraw": false, "playerName": "Bob"});
        assert_eq!(
            WinnerCurrentTurn::from_plain(&plain),
            Some(WinnerCurrentTurn::winner("Bob"))
        );
        assert!(!WinnerCurrentTurn::is_valid(&json!({"isDraw": 0, "playerName": "Bob"})));
        assert!(!WinnerCurrentTurn::is_valid(&json!({"_draw": false, "playerName": "Bob"})));
    }

    // =====================================================================
    // GameInfo
    // =====================================================================

    #[test]
    fn test_game_info_defaults() {
        let info = GameInfo::new(MyPlayer::new(alice(), vec![]), vec![alice()]);
        assert_eq!(info.turn_num, Number::from(1));
        assert!(!info.is_bid_card_open);
        assert!(info.winner_current_turn.is_none());
    }

    #[test]
    fn test_game_info_plain_round_trip_is_stable() {
        let info = sample_game_info();
        let plain = info.to_plain();
        let rebuilt = GameInfo::from_plain(&plain).expect("snapshot should validate");
        assert_eq!(rebuilt, info);
        assert_eq!(rebuilt.to_plain(), plain);
    }

    #[test]
    fn test_game_info_requires_all_five_fields() {
        let plain = sample_game_info().to_plain();
        for key in ["turnNum", "myPlayer", "players", "isBidCardOpen", "winnerCurrentTurn"] {
            let mut broken = plain.clone();
            broken.as_object_mut().unwrap().remove(key);
            assert!(!GameInfo::is_valid(&broken), "missing {key} should be invalid");
        }
    }

    #[test]
    fn test_game_info_turn_num_is_any_number() {
        let mut plain = sample_game_info().to_plain();
        plain["turnNum"] = json!(4294967296u64);
        assert!(GameInfo::is_valid(&plain));
        plain["turnNum"] = json!(2.5);
        assert!(GameInfo::is_valid(&plain));
        plain["turnNum"] = json!("3");
        assert!(!GameInfo::is_valid(&plain));
    }

    #[test]
    fn test_game_info_null_winner_is_valid() {
        let mut plain = sample_game_info().to_plain();
        plain["winnerCurrentTurn"] = Value::Null;
        let rebuilt = GameInfo::from_plain(&plain).unwrap();
        assert!(rebuilt.winner_current_turn.is_none());
    }

    #[test]
    fn test_game_info_rejects_any_invalid_player() {
        let mut plain = sample_game_info().to_plain();
        plain["players"][1]["pointCards"] = json!("none");
        assert!(!GameInfo::is_valid(&plain));
    }

    #[test]
    fn test_game_info_rejects_bad_private_hand() {
        let mut plain = sample_game_info().to_plain();
        plain["myPlayer"]["myCards"] = json!([1, "two"]);
        assert!(!GameInfo::is_valid(&plain));
    }

    #[test]
    fn test_game_info_player_lookup_and_bid_state() {
        let info = sample_game_info();
        assert_eq!(info.player(&PlayerId::from(2u64)).unwrap().name, "Bob");
        assert!(info.player(&PlayerId::from(3u64)).is_none());
        assert!(!info.all_bids_placed());
    }
}
