use numauction_protocol::{
    cards, Card, Direction, EnvelopeCodec, FinishGame, FinishTurn, Frame, GameInfo, GameStart, Hello,
    Message, MyPlayer, Player, PlayerInfo, ProtocolError, Registry, RequestBid, RequestId,
    RequestJoin, RequestReadyGame, RequestSignIn, ResponseBid, ResponseJoin, ResponseReadyGame,
    ResponseSignIn, ResultCode, StartTurn, UpdatePlayerBidStatus, UpdatePlayers,
    WinnerCurrentTurn,
};
use serde_json::Number;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

const NAMES: [&str; 2] = ["Alice", "Bob"];
const HAND: [i64; 3] = [1, 2, 3];
/// The point card up for auction on each turn.
const POINT_CARDS: [i64; 3] = [5, 3, 4];
/// `BIDS[turn][seat]`
const BIDS: [[i64; 2]; 3] = [[3, 2], [1, 1], [2, 3]];

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("frame serialization failed: {0}")]
    Frame(#[from] serde_json::Error),

    #[error("{0} was dropped by the receiving codec")]
    Dropped(&'static str),

    #[error("unexpected message: {0}")]
    Unexpected(String),
}

// ---------------------------------------------------------------------------
// In-memory link
// ---------------------------------------------------------------------------

/// One end of the link. Decodes only what its side may legally receive.
struct Peer<'r> {
    name: &'static str,
    codec: EnvelopeCodec<'r>,
}

impl Peer<'_> {
    /// Encodes `message`, ships it as frame bytes, and returns what `to`
    /// decodes.
    fn send(&self, to: &Peer<'_>, message: Message) -> Result<Message, DemoError> {
        let frame = Frame {
            data: self.codec.encode_checked(&message)?,
        };
        let bytes = serde_json::to_vec(&frame)?;
        tracing::info!(from = self.name, to = to.name, data = %frame.data, "frame");
        to.codec
            .decode_bytes(&bytes)
            .ok_or(DemoError::Dropped(message.tag()))
    }
}

/// Sends a request and checks that the reply answers it.
fn exchange(
    client: &Peer<'_>,
    server: &Peer<'_>,
    request: Message,
    reply: impl FnOnce(&Message) -> Message,
) -> Result<Message, DemoError> {
    let received = client.send(server, request)?;
    let response = server.send(client, reply(&received))?;
    if !response.is_response_to(&received) {
        return Err(DemoError::Unexpected(response.to_string()));
    }
    Ok(response)
}

/// The id to echo back, taken from the received request.
fn reply_id(request: &Message) -> RequestId {
    request.request_id().cloned().unwrap_or_else(|| RequestId::new(0))
}

// ---------------------------------------------------------------------------
// Server-side table
// ---------------------------------------------------------------------------

/// Just enough game state to produce realistic snapshots.
struct Table {
    players: Vec<Player>,
    hands: Vec<Vec<Card>>,
    turn_num: u32,
    is_bid_card_open: bool,
    winner: Option<WinnerCurrentTurn>,
}

impl Table {
    fn new() -> Self {
        Self {
            players: NAMES
                .iter()
                .zip(1u64..)
                .map(|(name, id)| Player::new(id, *name))
                .collect(),
            hands: vec![cards(HAND); NAMES.len()],
            turn_num: 1,
            is_bid_card_open: false,
            winner: None,
        }
    }

    fn snapshot(&self, seat: usize) -> GameInfo {
        GameInfo {
            turn_num: Number::from(self.turn_num),
            my_player: MyPlayer::new(self.players[seat].clone(), self.hands[seat].clone()),
            players: self.players.clone(),
            is_bid_card_open: self.is_bid_card_open,
            winner_current_turn: self.winner.clone(),
        }
    }

    fn place_bid(&mut self, seat: usize, card: Card) -> ResultCode {
        let player = &mut self.players[seat];
        if player.has_bid() {
            return ResultCode::AlreadyBid;
        }
        self.hands[seat].retain(|c| c != &card);
        player.used_cards.push(card.clone());
        player.bid_card = Some(card);
        ResultCode::Success
    }

    /// Reveals the bids and awards the point card to the highest bidder.
    fn resolve(&mut self, point_card: i64) {
        let bids: Vec<Option<f64>> = self
            .players
            .iter()
            .map(|p| p.bid_card.as_ref().and_then(Number::as_f64))
            .collect();
        let best = bids.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
        let leaders: Vec<usize> = (0..bids.len()).filter(|&i| bids[i] == Some(best)).collect();

        self.is_bid_card_open = true;
        self.winner = Some(match leaders.as_slice() {
            [seat] => {
                self.players[*seat].point_cards.push(Card::from(point_card));
                WinnerCurrentTurn::winner(self.players[*seat].name.clone())
            }
            _ => WinnerCurrentTurn::draw(),
        });
    }

    fn next_turn(&mut self) {
        self.turn_num += 1;
        self.is_bid_card_open = false;
        self.winner = None;
        for player in &mut self.players {
            player.bid_card = None;
        }
    }

    fn score(&self, seat: usize) -> i64 {
        self.players[seat].point_cards.iter().filter_map(Number::as_i64).sum()
    }

    /// Answers a bid request on behalf of `seat`.
    fn answer_bid(&mut self, seat: usize, request: &Message) -> Message {
        let code = match request {
            Message::RequestBid(bid) => self.place_bid(seat, bid.bid_card.clone()),
            _ => ResultCode::AlreadyBid,
        };
        ResponseBid::new(reply_id(request), code).into()
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

fn run() -> Result<Table, DemoError> {
    let server_registry = Registry::builder()
        .with_standard_direction(Direction::ClientToServer)?
        .build();
    let client_registry = Registry::builder()
        .with_standard_direction(Direction::ServerToClient)?
        .build();

    let server = Peer {
        name: "server",
        codec: EnvelopeCodec::new(&server_registry),
    };
    let clients: Vec<Peer<'_>> = NAMES
        .iter()
        .map(|&name| Peer {
            name,
            codec: EnvelopeCodec::new(&client_registry),
        })
        .collect();

    // Handshake, sign-in, join, ready.
    let mut roster = Vec::new();
    for (seat, client) in clients.iter().enumerate() {
        server.send(client, Hello.into())?;

        exchange(client, &server, RequestSignIn::new(RequestId::new(1), NAMES[seat]).into(), |req| {
            ResponseSignIn::new(reply_id(req)).into()
        })?;

        roster.push(PlayerInfo::new(seat as u64 + 1, NAMES[seat]));
        let view: Vec<PlayerInfo> = roster
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, info)| info.with_self(i == seat))
            .collect();
        exchange(client, &server, RequestJoin::new(RequestId::new(2)).into(), |req| {
            ResponseJoin::allowed(reply_id(req), view).into()
        })?;
        for other in &clients[..seat] {
            server.send(other, UpdatePlayers::new(roster.clone()).into())?;
        }
    }

    for client in &clients {
        exchange(client, &server, RequestReadyGame::new(RequestId::new(3)).into(), |req| {
            ResponseReadyGame::new(reply_id(req)).into()
        })?;
    }

    // Game.
    let mut table = Table::new();
    for (seat, client) in clients.iter().enumerate() {
        server.send(client, GameStart::new(table.snapshot(seat)).into())?;
    }

    let mut next_request = 10u64;
    for (turn, point_card) in POINT_CARDS.iter().enumerate() {
        tracing::info!(turn = table.turn_num, point_card, "turn begins");

        for (seat, client) in clients.iter().enumerate() {
            let bid = RequestBid::new(RequestId::new(next_request), table.turn_num, BIDS[turn][seat]);
            next_request += 1;

            exchange(client, &server, bid.into(), |req| table.answer_bid(seat, req))?;
            for peer in &clients {
                let status = UpdatePlayerBidStatus::new(table.turn_num, seat as u64 + 1);
                server.send(peer, status.into())?;
            }
        }

        // A repeated bid is refused.
        let again = RequestBid::new(RequestId::new(next_request), table.turn_num, 1);
        next_request += 1;
        let refused = exchange(&clients[0], &server, again.into(), |req| table.answer_bid(0, req))?;
        tracing::debug!(reply = %refused, "repeated bid refused");

        table.resolve(*point_card);
        for (seat, client) in clients.iter().enumerate() {
            server.send(client, FinishTurn::new(table.snapshot(seat)).into())?;
        }

        if turn + 1 < POINT_CARDS.len() {
            table.next_turn();
            for (seat, client) in clients.iter().enumerate() {
                server.send(client, StartTurn::new(table.snapshot(seat)).into())?;
            }
        }
    }

    for (seat, client) in clients.iter().enumerate() {
        server.send(client, FinishGame::new(table.snapshot(seat)).into())?;
    }
    Ok(table)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let table = run()?;
    for (seat, name) in NAMES.iter().enumerate() {
        tracing::info!(player = name, score = table.score(seat), "final score");
    }
    Ok(())
}
