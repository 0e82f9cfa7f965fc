//! Core wire types shared by every message payload.
//!
//! Field names follow the server's JSON (camelCase); the serde attributes
//! on each type pin the exact wire shape, and the tests at the bottom
//! verify it. A mismatch here means the client silently desyncs, so the
//! shapes are treated as frozen.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// The server assigns these (UUID strings on the current wire); the client
/// treats them as opaque. Newtype wrapper so a player id can't be confused
/// with any other string, and `#[serde(transparent)]` so it serializes as
/// the plain string, not `{"0": "..."}`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// True for the empty id used as the pre-join placeholder.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A unique identifier for a card (white or black).
///
/// Card ids are unique within a hand / a round, which is all the client
/// ever relies on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// Body used when the server references a card the client cannot
/// resolve. Display-only; reconciliation never depends on it.
pub const UNRESOLVED_CARD_BODY: &str = "Cannot load this card :(";

/// A response (white) card a non-czar player may submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteCard {
    pub id: CardId,
    pub body_text: String,
}

impl WhiteCard {
    /// The placeholder for a card the server sent as `null` or an id the
    /// hand cannot resolve.
    pub fn unresolved(id: CardId) -> Self {
        Self {
            id,
            body_text: UNRESOLVED_CARD_BODY.to_string(),
        }
    }
}

/// Lenient card-list deserializers.
///
/// The server occasionally emits `null` in a card list when it failed to
/// load the card. A strict `Vec<WhiteCard>` would reject the whole frame
/// over one bad entry, losing a join or phase transition; these map each
/// `null` to the placeholder card (id `-1`) instead.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::{CardId, WhiteCard};

    pub fn cards<'de, D>(de: D) -> Result<Vec<WhiteCard>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cards = <Option<Vec<Option<WhiteCard>>>>::deserialize(de)?;
        Ok(resolve(cards.unwrap_or_default()))
    }

    pub fn bundles<'de, D>(
        de: D,
    ) -> Result<Vec<Vec<WhiteCard>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bundles =
            <Option<Vec<Option<Vec<Option<WhiteCard>>>>>>::deserialize(
                de,
            )?;
        Ok(bundles
            .unwrap_or_default()
            .into_iter()
            .map(|bundle| resolve(bundle.unwrap_or_default()))
            .collect())
    }

    fn resolve(cards: Vec<Option<WhiteCard>>) -> Vec<WhiteCard> {
        cards
            .into_iter()
            .map(|card| {
                card.unwrap_or_else(|| WhiteCard::unresolved(CardId(-1)))
            })
            .collect()
    }
}

/// The round's prompt (black) card.
///
/// `cards_to_play` is how many response cards the prompt requires; it
/// bounds the local player's play list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackCard {
    pub id: CardId,
    pub body_text: String,
    pub cards_to_play: usize,
}

// ---------------------------------------------------------------------------
// Game phase
// ---------------------------------------------------------------------------

/// The lobby's game-phase state machine.
///
/// ```text
///   InLobby ──→ SelectingWhiteCards ──→ CzarJudging
///      ↑                ↑                    │
///      │                └──── next round ────┘
///      └───────────── game end
/// ```
///
/// The wire value is a bare integer (1, 2, 3 — fixed by the server's
/// enumeration), hence the `try_from`/`into` round trip through `u8`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum GamePhase {
    /// Pre-game: settings and card packs are being configured.
    #[default]
    InLobby,
    /// Non-czar players are choosing white cards to submit.
    SelectingWhiteCards,
    /// All plays are in; the czar is judging.
    CzarJudging,
}

impl From<GamePhase> for u8 {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::InLobby => 1,
            GamePhase::SelectingWhiteCards => 2,
            GamePhase::CzarJudging => 3,
        }
    }
}

impl TryFrom<u8> for GamePhase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::InLobby),
            2 => Ok(Self::SelectingWhiteCards),
            3 => Ok(Self::CzarJudging),
            other => Err(format!("invalid game phase {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings and players
// ---------------------------------------------------------------------------

/// The owner-configurable game settings.
///
/// `card_packs` holds opaque pack identifiers; the pack catalogue itself
/// is fetched out of band and is not this crate's concern.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Game ends when this many rounds have been played.
    pub max_rounds: u32,
    /// Game ends when someone reaches this many points.
    pub playing_to_points: u32,
    /// Empty string means no password.
    pub game_password: String,
    pub max_players: u32,
    pub card_packs: Vec<String>,
}

/// A player record as the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub connected: bool,
    pub points: u32,
    pub has_played: bool,
}

// ---------------------------------------------------------------------------
// Full-state snapshot (join payload)
// ---------------------------------------------------------------------------

/// Round progress as carried inside the join snapshot.
///
/// Unlike the standalone round-information message, `your_plays` here is a
/// list of card *ids* (the client resolves them against `your_hand`), and
/// the submitted-play markers arrive as the id list
/// `players_who_have_played`.
///
/// Every field is defaulted: when the game is still in the lobby the
/// server omits round data entirely.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRoundInfo {
    pub round_number: u32,
    pub czar_id: PlayerId,
    pub black_card: Option<BlackCard>,
    #[serde(deserialize_with = "lenient::cards")]
    pub your_hand: Vec<WhiteCard>,
    pub your_plays: Vec<CardId>,
    pub players_who_have_played: Vec<PlayerId>,
}

/// The server-provided full game state, sent once on (re)join.
///
/// This is the one payload that touches every replica slice: lobby,
/// roster, and round are all replaced wholesale from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateInfo {
    pub settings: GameSettings,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,
    pub game_state: GamePhase,
    pub players: Vec<Player>,
    pub game_owner_id: PlayerId,
    #[serde(default)]
    pub round_info: JoinRoundInfo,
    /// Anonymized play bundles, present when joining mid-judging.
    #[serde(default, deserialize_with = "lenient::bundles")]
    pub all_plays: Vec<Vec<WhiteCard>>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests. The server's JSON is the contract; these pin the
    //! serde attributes to it.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::from("P1")).unwrap();
        assert_eq!(json, "\"P1\"");
    }

    #[test]
    fn test_card_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&CardId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_game_phase_wire_values_are_fixed() {
        assert_eq!(serde_json::to_string(&GamePhase::InLobby).unwrap(), "1");
        assert_eq!(
            serde_json::to_string(&GamePhase::SelectingWhiteCards).unwrap(),
            "2"
        );
        assert_eq!(
            serde_json::to_string(&GamePhase::CzarJudging).unwrap(),
            "3"
        );
    }

    #[test]
    fn test_game_phase_rejects_out_of_range_value() {
        let result: Result<GamePhase, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn test_game_phase_default_is_in_lobby() {
        assert_eq!(GamePhase::default(), GamePhase::InLobby);
    }

    #[test]
    fn test_settings_field_names_are_camel_case() {
        let settings = GameSettings {
            max_rounds: 15,
            playing_to_points: 10,
            game_password: "hunter2".into(),
            max_players: 8,
            card_packs: vec!["pack-a".into()],
        };
        let json: serde_json::Value =
            serde_json::to_value(&settings).unwrap();

        assert_eq!(json["maxRounds"], 15);
        assert_eq!(json["playingToPoints"], 10);
        assert_eq!(json["gamePassword"], "hunter2");
        assert_eq!(json["maxPlayers"], 8);
        assert_eq!(json["cardPacks"][0], "pack-a");
    }

    #[test]
    fn test_player_has_played_is_camel_case() {
        let player = Player {
            id: PlayerId::from("P1"),
            name: "Alice".into(),
            connected: true,
            points: 3,
            has_played: false,
        };
        let json: serde_json::Value =
            serde_json::to_value(&player).unwrap();
        assert_eq!(json["hasPlayed"], false);
        assert_eq!(json["id"], "P1");
    }

    #[test]
    fn test_black_card_round_trip() {
        let card = BlackCard {
            id: CardId(9),
            body_text: "____ is the answer.".into(),
            cards_to_play: 2,
        };
        let json = serde_json::to_string(&card).unwrap();
        let decoded: BlackCard = serde_json::from_str(&json).unwrap();
        assert_eq!(card, decoded);
    }

    #[test]
    fn test_game_state_info_parses_lobby_only_snapshot() {
        // In the lobby the server sends no round data; roundInfo and
        // allPlays must default cleanly.
        let json = r#"{
            "settings": {
                "maxRounds": 10,
                "playingToPoints": 5,
                "gamePassword": "",
                "maxPlayers": 6,
                "cardPacks": []
            },
            "creationTime": "2026-02-01T12:00:00Z",
            "gameState": 1,
            "players": [],
            "gameOwnerId": "P1"
        }"#;
        let state: GameStateInfo = serde_json::from_str(json).unwrap();

        assert_eq!(state.game_state, GamePhase::InLobby);
        assert_eq!(state.game_owner_id, PlayerId::from("P1"));
        assert!(state.round_info.your_hand.is_empty());
        assert!(state.all_plays.is_empty());
        assert_eq!(state.creation_time.year(), 2026);
    }

    #[test]
    fn test_join_snapshot_tolerates_null_cards() {
        let json = r#"{
            "roundNumber": 1,
            "czarId": "P2",
            "blackCard": {"id": 1, "bodyText": "Why?", "cardsToPlay": 1},
            "yourHand": [null, {"id": 10, "bodyText": "Cats."}],
            "yourPlays": [],
            "playersWhoHavePlayed": []
        }"#;
        let info: JoinRoundInfo = serde_json::from_str(json).unwrap();

        assert_eq!(
            info.your_hand,
            vec![
                WhiteCard::unresolved(CardId(-1)),
                WhiteCard {
                    id: CardId(10),
                    body_text: "Cats.".into(),
                },
            ]
        );
    }

    #[test]
    fn test_join_round_info_parses_mid_round_snapshot() {
        let json = r#"{
            "roundNumber": 3,
            "czarId": "P2",
            "blackCard": {"id": 1, "bodyText": "Why?", "cardsToPlay": 1},
            "yourHand": [{"id": 10, "bodyText": "Cats."}],
            "yourPlays": [10],
            "playersWhoHavePlayed": ["P1", "P3"]
        }"#;
        let info: JoinRoundInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.round_number, 3);
        assert_eq!(info.your_plays, vec![CardId(10)]);
        assert_eq!(info.players_who_have_played.len(), 2);
        assert_eq!(info.black_card.unwrap().cards_to_play, 1);
    }
}
