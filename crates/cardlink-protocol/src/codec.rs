//! Envelope codec: [`Message`] ↔ `{"type": <int>, "data": <object>}`.
//!
//! Encoding and decoding are pure and stateless. The envelope tag is an
//! integer, which rules out serde's built-in enum tagging (string tags
//! only), so the codec goes through a raw envelope holding the tag and an
//! untyped `data` value, then matches the tag exhaustively.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Message, tag};
use crate::ProtocolError;

/// The envelope as it appears on the wire, before the tag is interpreted.
#[derive(Serialize, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    tag: u32,
    /// Empty-payload messages may send `{}`, `null`, or omit the field.
    #[serde(default)]
    data: Value,
}

/// Serializes a message into a wire text frame.
///
/// # Errors
/// Returns [`ProtocolError::Malformed`] if serialization fails — which
/// only happens for pathological payloads (e.g. non-finite floats), never
/// for the types in this crate.
pub fn encode(msg: &Message) -> Result<String, ProtocolError> {
    let data = match msg {
        Message::Join(p) => to_value(p)?,
        Message::PlayerJoined(p) => to_value(p)?,
        Message::PlayerCreated(p) => to_value(p)?,
        Message::PlayerDisconnected(p) => to_value(p)?,
        Message::PlayerLeft(p) => to_value(p)?,
        Message::OwnerChanged(p) => to_value(p)?,
        Message::CommandError(p) => to_value(p)?,
        Message::ChangeSettings(p) => to_value(p)?,
        Message::RoundInformation(p) => to_value(p)?,
        Message::PlayCards(p) => to_value(p)?,
        Message::CardPlayed(p) => to_value(p)?,
        Message::CzarJudgingPhase(p) => to_value(p)?,
        Message::CzarSelectCard(p) => to_value(p)?,
        Message::WhiteCardPlayPhase(p) => to_value(p)?,
        Message::GameEnded(p) => to_value(p)?,
        Message::BlackCardSkipped(p) => to_value(p)?,
        Message::KickPlayer(p) => to_value(p)?,
        // Empty payloads go out as `{}`, matching the server.
        Message::Ping | Message::StartGame | Message::SkipBlackCard => {
            Value::Object(serde_json::Map::new())
        }
    };

    let raw = RawEnvelope {
        tag: msg.tag(),
        data,
    };
    serde_json::to_string(&raw).map_err(ProtocolError::Malformed)
}

/// Parses a wire text frame into a [`Message`].
///
/// # Errors
/// - [`ProtocolError::Malformed`] — not a well-formed envelope, or the
///   `data` object doesn't match the tag's payload shape.
/// - [`ProtocolError::UnknownType`] — a tag outside the enumerated set.
pub fn decode(text: &str) -> Result<Message, ProtocolError> {
    let raw: RawEnvelope =
        serde_json::from_str(text).map_err(ProtocolError::Malformed)?;

    let msg = match raw.tag {
        tag::ON_JOIN => Message::Join(payload(raw.data)?),
        tag::ON_PLAYER_JOIN => Message::PlayerJoined(payload(raw.data)?),
        tag::ON_PLAYER_CREATE => {
            Message::PlayerCreated(payload(raw.data)?)
        }
        tag::ON_PLAYER_DISCONNECT => {
            Message::PlayerDisconnected(payload(raw.data)?)
        }
        tag::ON_PLAYER_LEAVE => Message::PlayerLeft(payload(raw.data)?),
        tag::NEW_OWNER => Message::OwnerChanged(payload(raw.data)?),
        tag::COMMAND_ERROR => Message::CommandError(payload(raw.data)?),
        tag::CHANGE_SETTINGS => {
            Message::ChangeSettings(payload(raw.data)?)
        }
        tag::PING => Message::Ping,
        tag::START_GAME => Message::StartGame,
        tag::ROUND_INFORMATION => {
            Message::RoundInformation(payload(raw.data)?)
        }
        tag::PLAY_CARDS => Message::PlayCards(payload(raw.data)?),
        tag::ON_CARD_PLAYED => Message::CardPlayed(payload(raw.data)?),
        tag::ON_CZAR_JUDGING_PHASE => {
            Message::CzarJudgingPhase(payload(raw.data)?)
        }
        tag::CZAR_SELECT_CARD => {
            Message::CzarSelectCard(payload(raw.data)?)
        }
        tag::ON_WHITE_CARD_PLAY_PHASE => {
            Message::WhiteCardPlayPhase(payload(raw.data)?)
        }
        tag::ON_GAME_END => Message::GameEnded(payload(raw.data)?),
        tag::ON_BLACK_CARD_SKIPPED => {
            Message::BlackCardSkipped(payload(raw.data)?)
        }
        tag::SKIP_BLACK_CARD => Message::SkipBlackCard,
        tag::KICK_PLAYER => Message::KickPlayer(payload(raw.data)?),
        other => return Err(ProtocolError::UnknownType(other)),
    };

    Ok(msg)
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(payload).map_err(ProtocolError::Malformed)
}

fn payload<T: DeserializeOwned>(data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(ProtocolError::Malformed)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::*;
    use crate::types::{
        BlackCard, CardId, GamePhase, GameSettings, GameStateInfo,
        JoinRoundInfo, Player, WhiteCard,
    };
    use time::OffsetDateTime;

    fn white(id: i64, text: &str) -> WhiteCard {
        WhiteCard {
            id: CardId(id),
            body_text: text.into(),
        }
    }

    fn black(id: i64) -> BlackCard {
        BlackCard {
            id: CardId(id),
            body_text: "____.".into(),
            cards_to_play: 1,
        }
    }

    fn settings() -> GameSettings {
        GameSettings {
            max_rounds: 10,
            playing_to_points: 7,
            game_password: String::new(),
            max_players: 6,
            card_packs: vec!["base".into()],
        }
    }

    #[test]
    fn test_encode_produces_integer_tagged_envelope() {
        let text = encode(&Message::CommandError(CommandRejected {
            reason: "bad settings".into(),
        }))
        .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&text).unwrap();

        assert_eq!(value["type"], 7);
        assert_eq!(value["data"]["reason"], "bad settings");
    }

    #[test]
    fn test_encode_empty_payload_is_empty_object() {
        let text = encode(&Message::Ping).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], 9);
        assert_eq!(value["data"], serde_json::json!({}));
    }

    #[test]
    fn test_round_trip_every_message() {
        // One entry per wire tag; every message must survive
        // encode → decode unchanged.
        let messages = vec![
            Message::Join(Joined {
                state: GameStateInfo {
                    settings: settings(),
                    creation_time: OffsetDateTime::UNIX_EPOCH,
                    game_state: GamePhase::SelectingWhiteCards,
                    players: vec![Player {
                        id: "P1".into(),
                        name: "Alice".into(),
                        connected: true,
                        points: 2,
                        has_played: false,
                    }],
                    game_owner_id: "P1".into(),
                    round_info: JoinRoundInfo {
                        round_number: 3,
                        czar_id: "P2".into(),
                        black_card: Some(black(5)),
                        your_hand: vec![white(1, "A.")],
                        your_plays: vec![CardId(1)],
                        players_who_have_played: vec!["P1".into()],
                    },
                    all_plays: vec![vec![white(1, "A.")]],
                },
            }),
            Message::PlayerJoined(PlayerJoined {
                id: "P3".into(),
                name: Some("Cara".into()),
            }),
            Message::PlayerCreated(PlayerCreated {
                id: "P4".into(),
                name: "Dov".into(),
            }),
            Message::PlayerDisconnected(PlayerDisconnected {
                id: "P3".into(),
                reason: Some("timeout".into()),
            }),
            Message::PlayerLeft(PlayerLeft {
                id: "P4".into(),
                reason: None,
            }),
            Message::OwnerChanged(OwnerChanged { id: "P2".into() }),
            Message::CommandError(CommandRejected {
                reason: "bad settings".into(),
            }),
            Message::RoundInformation(RoundInformation {
                round_number: 2,
                current_card_czar_id: "P2".into(),
                black_card: black(5),
                your_hand: vec![white(1, "A."), white(2, "B.")],
                your_plays: vec![],
                total_plays: 0,
            }),
            Message::CardPlayed(CardPlayed {
                player_id: "P1".into(),
            }),
            Message::CzarJudgingPhase(CzarJudgingPhase {
                all_plays: vec![vec![white(1, "A.")]],
                new_hand: vec![white(3, "C.")],
            }),
            Message::WhiteCardPlayPhase(WhiteCardPlayPhase {
                winner_id: Some("P1".into()),
                black_card: black(6),
                your_hand: vec![white(3, "C.")],
                card_czar_id: "P3".into(),
            }),
            Message::GameEnded(GameEnded {
                winner_id: Some("P1".into()),
            }),
            Message::BlackCardSkipped(BlackCardSkipped {
                new_black_card: black(7),
            }),
            Message::ChangeSettings(SettingsUpdate {
                settings: settings(),
            }),
            Message::Ping,
            Message::StartGame,
            Message::PlayCards(PlayCards {
                card_ids: vec![CardId(1), CardId(2)],
            }),
            Message::CzarSelectCard(CzarSelectCard {
                cards: vec![CardId(3)],
            }),
            Message::SkipBlackCard,
            Message::KickPlayer(KickPlayer {
                player_id: "P9".into(),
            }),
        ];
        assert_eq!(messages.len(), 20);

        for msg in messages {
            let text = encode(&msg).unwrap();
            let decoded = decode(&text).unwrap();
            assert_eq!(msg, decoded, "round trip failed for {text}");
        }
    }

    #[test]
    fn test_decode_null_card_in_hand_keeps_the_frame() {
        // The server emits `null` for a card it failed to load; one bad
        // entry must not cost the whole round-information frame.
        let frame = r#"{"type": 11, "data": {
            "roundNumber": 1,
            "currentCardCzarId": "P2",
            "blackCard": {"id": 5, "bodyText": "____.", "cardsToPlay": 1},
            "yourHand": [{"id": 1, "bodyText": "A."}, null],
            "yourPlays": [],
            "totalPlays": 0
        }}"#;

        let Message::RoundInformation(info) = decode(frame).unwrap()
        else {
            panic!("expected round information");
        };
        assert_eq!(info.your_hand[0], white(1, "A."));
        assert_eq!(info.your_hand[1], WhiteCard::unresolved(CardId(-1)));
    }

    #[test]
    fn test_decode_null_plays_in_judging_become_placeholders() {
        let frame = r#"{"type": 14, "data": {
            "allPlays": [[null, {"id": 2, "bodyText": "B."}], null],
            "newHand": [null]
        }}"#;

        let Message::CzarJudgingPhase(p) = decode(frame).unwrap()
        else {
            panic!("expected judging phase");
        };
        assert_eq!(p.all_plays[0][0], WhiteCard::unresolved(CardId(-1)));
        assert_eq!(p.all_plays[0][1], white(2, "B."));
        // A null bundle degrades to an empty one, keeping bundle indexes
        // aligned for czar selection.
        assert!(p.all_plays[1].is_empty());
        assert_eq!(p.new_hand, vec![WhiteCard::unresolved(CardId(-1))]);
    }

    #[test]
    fn test_decode_unknown_tag_9999() {
        let err =
            decode(r#"{"type": 9999, "data": {}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownType(9999)));
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_decode_wrong_payload_shape_is_malformed() {
        // Valid envelope, but tag 13 promises {"playerId": ...}.
        let err =
            decode(r#"{"type": 13, "data": {"wrong": true}}"#)
                .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_decode_ping_tolerates_missing_data() {
        // The server may omit `data` entirely for empty payloads.
        let msg = decode(r#"{"type": 9}"#).unwrap();
        assert_eq!(msg, Message::Ping);

        let msg = decode(r#"{"type": 9, "data": null}"#).unwrap();
        assert_eq!(msg, Message::Ping);
    }

    #[test]
    fn test_decode_envelope_missing_type_is_malformed() {
        let err = decode(r#"{"data": {}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }
}
