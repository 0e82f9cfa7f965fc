//! The enumerated message set: one sum type over every protocol tag.
//!
//! The wire envelope is `{"type": <int>, "data": <object>}`. Each tag has
//! one fixed meaning per protocol version; the constants in [`tag`] pin
//! the numbers. Putting both directions in a single [`Message`] enum gives
//! the reconciliation dispatcher an exhaustive `match` over the whole
//! protocol — adding a tag without handling it everywhere is a compile
//! error, not a runtime surprise.

use serde::{Deserialize, Serialize};

use crate::types::{
    BlackCard, CardId, GameSettings, GameStateInfo, PlayerId, WhiteCard,
};

/// The integer type discriminants, exactly as the server enumerates them.
///
/// Tags 1–16 are the server's original enumeration (consecutive, starting
/// at 1); 17–20 were appended later for game end, prompt skipping, and
/// kicking.
pub mod tag {
    pub const ON_JOIN: u32 = 1;
    pub const ON_PLAYER_JOIN: u32 = 2;
    pub const ON_PLAYER_CREATE: u32 = 3;
    pub const ON_PLAYER_DISCONNECT: u32 = 4;
    pub const ON_PLAYER_LEAVE: u32 = 5;
    pub const NEW_OWNER: u32 = 6;
    pub const COMMAND_ERROR: u32 = 7;
    pub const CHANGE_SETTINGS: u32 = 8;
    pub const PING: u32 = 9;
    pub const START_GAME: u32 = 10;
    pub const ROUND_INFORMATION: u32 = 11;
    pub const PLAY_CARDS: u32 = 12;
    pub const ON_CARD_PLAYED: u32 = 13;
    pub const ON_CZAR_JUDGING_PHASE: u32 = 14;
    pub const CZAR_SELECT_CARD: u32 = 15;
    pub const ON_WHITE_CARD_PLAY_PHASE: u32 = 16;
    pub const ON_GAME_END: u32 = 17;
    pub const ON_BLACK_CARD_SKIPPED: u32 = 18;
    pub const SKIP_BLACK_CARD: u32 = 19;
    pub const KICK_PLAYER: u32 = 20;
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Tag 1 — the full state snapshot sent once on (re)join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joined {
    pub state: GameStateInfo,
}

/// Tag 2 — a player (re)connected to the game.
///
/// The server omits `name` on reconnects; the roster already knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub id: PlayerId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Tag 3 — a player record was created (not yet connected).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCreated {
    pub id: PlayerId,
    pub name: String,
}

/// Tag 4 — a player lost their connection (record is kept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDisconnected {
    pub id: PlayerId,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Tag 5 — a player left for good (record is deleted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLeft {
    pub id: PlayerId,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Tag 6 — ownership of the lobby moved to another player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerChanged {
    pub id: PlayerId,
}

/// Tag 7 — the server rejected a command. Recoverable; state unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRejected {
    pub reason: String,
}

/// Tag 8 — the settings sub-object, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub settings: GameSettings,
}

/// Tag 11 — the round snapshot sent when a new round starts.
///
/// Here `your_plays` carries full cards, unlike the id list inside the
/// join snapshot. `total_plays` counts players who have submitted,
/// including the local player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInformation {
    pub round_number: u32,
    pub current_card_czar_id: PlayerId,
    pub black_card: BlackCard,
    #[serde(deserialize_with = "crate::types::lenient::cards")]
    pub your_hand: Vec<WhiteCard>,
    #[serde(deserialize_with = "crate::types::lenient::cards")]
    pub your_plays: Vec<WhiteCard>,
    pub total_plays: u32,
}

/// Tag 12 — the local player submits response cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCards {
    pub card_ids: Vec<CardId>,
}

/// Tag 13 — some player (not necessarily local) has submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPlayed {
    pub player_id: PlayerId,
}

/// Tag 14 — judging begins: the anonymized play bundles plus the local
/// player's remaining hand (already-played cards removed server-side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CzarJudgingPhase {
    #[serde(deserialize_with = "crate::types::lenient::bundles")]
    pub all_plays: Vec<Vec<WhiteCard>>,
    #[serde(deserialize_with = "crate::types::lenient::cards")]
    pub new_hand: Vec<WhiteCard>,
}

/// Tag 15 — the czar picks the winning bundle by card ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CzarSelectCard {
    pub cards: Vec<CardId>,
}

/// Tag 16 — judging is over, the next selection phase begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteCardPlayPhase {
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    pub black_card: BlackCard,
    #[serde(deserialize_with = "crate::types::lenient::cards")]
    pub your_hand: Vec<WhiteCard>,
    pub card_czar_id: PlayerId,
}

/// Tag 17 — the game is over; back to the lobby.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct GameEnded {
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
}

/// Tag 18 — the czar discarded the prompt; a fresh one replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackCardSkipped {
    pub new_black_card: BlackCard,
}

/// Tag 20 — the czar removes a player from the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickPlayer {
    pub player_id: PlayerId,
}

// ---------------------------------------------------------------------------
// Message — the sum type
// ---------------------------------------------------------------------------

/// Every message in the protocol, both directions.
///
/// `Ping`, `StartGame` and `SkipBlackCard` carry no payload (the envelope's
/// `data` is an empty object). The rest wrap their payload struct.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // -- Server → client --
    Join(Joined),
    PlayerJoined(PlayerJoined),
    PlayerCreated(PlayerCreated),
    PlayerDisconnected(PlayerDisconnected),
    PlayerLeft(PlayerLeft),
    OwnerChanged(OwnerChanged),
    CommandError(CommandRejected),
    RoundInformation(RoundInformation),
    CardPlayed(CardPlayed),
    CzarJudgingPhase(CzarJudgingPhase),
    WhiteCardPlayPhase(WhiteCardPlayPhase),
    GameEnded(GameEnded),
    BlackCardSkipped(BlackCardSkipped),

    // -- Either direction --
    ChangeSettings(SettingsUpdate),
    /// Keep-alive. The client answers an inbound ping with an outbound
    /// ping (the "pong").
    Ping,

    // -- Client → server only --
    StartGame,
    PlayCards(PlayCards),
    CzarSelectCard(CzarSelectCard),
    SkipBlackCard,
    KickPlayer(KickPlayer),
}

impl Message {
    /// The wire type tag for this message.
    pub fn tag(&self) -> u32 {
        match self {
            Self::Join(_) => tag::ON_JOIN,
            Self::PlayerJoined(_) => tag::ON_PLAYER_JOIN,
            Self::PlayerCreated(_) => tag::ON_PLAYER_CREATE,
            Self::PlayerDisconnected(_) => tag::ON_PLAYER_DISCONNECT,
            Self::PlayerLeft(_) => tag::ON_PLAYER_LEAVE,
            Self::OwnerChanged(_) => tag::NEW_OWNER,
            Self::CommandError(_) => tag::COMMAND_ERROR,
            Self::ChangeSettings(_) => tag::CHANGE_SETTINGS,
            Self::Ping => tag::PING,
            Self::StartGame => tag::START_GAME,
            Self::RoundInformation(_) => tag::ROUND_INFORMATION,
            Self::PlayCards(_) => tag::PLAY_CARDS,
            Self::CardPlayed(_) => tag::ON_CARD_PLAYED,
            Self::CzarJudgingPhase(_) => tag::ON_CZAR_JUDGING_PHASE,
            Self::CzarSelectCard(_) => tag::CZAR_SELECT_CARD,
            Self::WhiteCardPlayPhase(_) => tag::ON_WHITE_CARD_PLAY_PHASE,
            Self::GameEnded(_) => tag::ON_GAME_END,
            Self::BlackCardSkipped(_) => tag::ON_BLACK_CARD_SKIPPED,
            Self::SkipBlackCard => tag::SKIP_BLACK_CARD,
            Self::KickPlayer(_) => tag::KICK_PLAYER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_the_server_enumeration() {
        // The first sixteen tags are consecutive from 1; the appended
        // four continue the sequence. These numbers are frozen.
        assert_eq!(tag::ON_JOIN, 1);
        assert_eq!(tag::ON_WHITE_CARD_PLAY_PHASE, 16);
        assert_eq!(tag::ON_GAME_END, 17);
        assert_eq!(tag::KICK_PLAYER, 20);
    }

    #[test]
    fn test_message_tag_accessor() {
        assert_eq!(Message::Ping.tag(), tag::PING);
        assert_eq!(Message::StartGame.tag(), tag::START_GAME);
        assert_eq!(
            Message::KickPlayer(KickPlayer {
                player_id: "P1".into(),
            })
            .tag(),
            tag::KICK_PLAYER
        );
    }

    #[test]
    fn test_player_joined_name_is_optional() {
        let msg: PlayerJoined =
            serde_json::from_str(r#"{"id": "P1"}"#).unwrap();
        assert_eq!(msg.id, "P1".into());
        assert!(msg.name.is_none());
    }

    #[test]
    fn test_play_cards_uses_camel_case_ids() {
        let payload = PlayCards {
            card_ids: vec![CardId(1), CardId(2)],
        };
        let json: serde_json::Value =
            serde_json::to_value(&payload).unwrap();
        assert_eq!(json["cardIds"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_game_ended_winner_is_optional() {
        let msg: GameEnded = serde_json::from_str("{}").unwrap();
        assert!(msg.winner_id.is_none());

        let msg: GameEnded =
            serde_json::from_str(r#"{"winnerId": "P3"}"#).unwrap();
        assert_eq!(msg.winner_id, Some("P3".into()));
    }
}
