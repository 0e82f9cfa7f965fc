//! The reconciliation dispatcher: the protocol state machine.
//!
//! [`apply`] maps one inbound message to mutations of the store's slices
//! and the change events those mutations emit. It is a plain function
//! over `&mut GameStore` — no socket, no locks — so every transition is
//! unit testable, and the `match` over [`Message`] is exhaustive: a new
//! protocol tag cannot be added without deciding its effect here.
//!
//! The engine's run loop calls this once per frame, in arrival order.

use cardlink_protocol::{
    GamePhase, GameStateInfo, Message, ProtocolError, RoundInformation,
};
use cardlink_state::{GameStore, LobbyState, Plays, RoundState};

use crate::CardlinkError;

/// What a message application produced besides state changes.
///
/// Only the keep-alive produces a reply; everything else is `none`. The
/// dispatcher never sends — the caller owns the outbound path.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub reply: Option<Message>,
}

impl Outcome {
    fn none() -> Self {
        Self::default()
    }

    fn reply(msg: Message) -> Self {
        Self { reply: Some(msg) }
    }
}

/// Applies one inbound message to the store.
///
/// # Errors
/// [`ProtocolError::UnexpectedClientMessage`] (wrapped) when a
/// client→server-only tag arrives inbound; no slice is mutated in that
/// case.
pub fn apply(
    store: &mut GameStore,
    msg: Message,
) -> Result<Outcome, CardlinkError> {
    tracing::debug!(tag = msg.tag(), "reconciling message");

    match msg {
        Message::Join(joined) => {
            handle_join(store, joined.state);
            Ok(Outcome::none())
        }

        Message::PlayerJoined(p) => {
            store.roster_mut().joined(p.id, p.name);
            store.emit_roster();
            Ok(Outcome::none())
        }

        Message::PlayerCreated(p) => {
            store.roster_mut().created(p.id, p.name);
            store.emit_roster();
            Ok(Outcome::none())
        }

        Message::PlayerDisconnected(p) => {
            store.roster_mut().disconnected(&p.id);
            store.emit_roster();
            Ok(Outcome::none())
        }

        Message::PlayerLeft(p) => {
            store.roster_mut().remove(&p.id);
            store.emit_roster();
            Ok(Outcome::none())
        }

        Message::OwnerChanged(p) => {
            store.lobby_mut().owner_id = p.id;
            store.emit_lobby();
            Ok(Outcome::none())
        }

        Message::CommandError(p) => {
            // No slice changes; the reason goes straight to observers.
            store.emit_command_error(p.reason);
            Ok(Outcome::none())
        }

        Message::ChangeSettings(p) => {
            store.lobby_mut().settings = p.settings.clone();
            store.emit_lobby();
            store.emit_settings(p.settings);
            Ok(Outcome::none())
        }

        // The pong: the one inbound message with an outbound effect.
        Message::Ping => Ok(Outcome::reply(Message::Ping)),

        Message::RoundInformation(info) => {
            handle_round_information(store, info);
            Ok(Outcome::none())
        }

        Message::CardPlayed(p) => {
            store.roster_mut().mark_played(&p.player_id);
            store.emit_roster();
            Ok(Outcome::none())
        }

        Message::CzarJudgingPhase(p) => {
            // Server-authoritative remaining hand replaces the local one;
            // cards already played are gone from it.
            store.round_mut().hand = p.new_hand;
            store.lobby_mut().phase = GamePhase::CzarJudging;
            store.emit_round();
            store.emit_lobby();
            store.emit_all_plays(p.all_plays);
            Ok(Outcome::none())
        }

        Message::WhiteCardPlayPhase(p) => {
            store.lobby_mut().phase = GamePhase::SelectingWhiteCards;

            let round = store.round_mut();
            round.round_number += 1;
            round.total_plays = 0;
            round.plays.clear();
            round.black_card = Some(p.black_card);
            round.hand = p.your_hand;
            round.czar_id = p.card_czar_id;

            if let Some(winner) = &p.winner_id {
                store.roster_mut().award_point(winner);
            }
            store.emit_all();
            Ok(Outcome::none())
        }

        Message::GameEnded(p) => {
            if let Some(winner) = &p.winner_id {
                store.roster_mut().award_point(winner);
            }
            store.round_mut().clear_transient();
            store.lobby_mut().phase = GamePhase::InLobby;
            store.emit_all();
            Ok(Outcome::none())
        }

        Message::BlackCardSkipped(p) => {
            let round = store.round_mut();
            round.black_card = Some(p.new_black_card);
            round.plays.clear();
            store.roster_mut().reset_played();
            store.emit_round();
            store.emit_roster();
            Ok(Outcome::none())
        }

        // These tags only ever travel client→server. Inbound, they mean
        // the peer is not speaking the protocol; nothing is mutated.
        m @ (Message::StartGame
        | Message::PlayCards(_)
        | Message::CzarSelectCard(_)
        | Message::SkipBlackCard
        | Message::KickPlayer(_)) => Err(CardlinkError::Protocol(
            ProtocolError::UnexpectedClientMessage(m.tag()),
        )),
    }
}

/// Tag 1: replace everything from the server's full snapshot, then emit
/// once — observers never see a partially applied join.
fn handle_join(store: &mut GameStore, state: GameStateInfo) {
    *store.lobby_mut() = LobbyState {
        owner_id: state.game_owner_id,
        settings: state.settings,
        created_at: state.creation_time,
        phase: state.game_state,
    };

    store.roster_mut().replace(state.players);

    let info = state.round_info;
    let mut round = RoundState {
        round_number: info.round_number,
        czar_id: info.czar_id,
        black_card: info.black_card,
        hand: info.your_hand,
        plays: Plays::default(),
        total_plays: info.players_who_have_played.len() as u32,
    };
    // The snapshot carries plays as ids; resolve against the dealt hand.
    let confirmed: Vec<_> = info
        .your_plays
        .iter()
        .map(|&id| round.resolve(id))
        .collect();
    round.plays.confirmed = confirmed;
    *store.round_mut() = round;

    // Replay the already-played markers so the roster agrees with the
    // round progress.
    for player_id in &info.players_who_have_played {
        store.roster_mut().mark_played(player_id);
    }

    store.emit_all_plays(state.all_plays);
    store.emit_all();
}

/// Tag 11: a new round starts.
fn handle_round_information(store: &mut GameStore, info: RoundInformation) {
    *store.round_mut() = RoundState {
        round_number: info.round_number,
        czar_id: info.current_card_czar_id,
        black_card: Some(info.black_card),
        hand: info.your_hand,
        plays: Plays {
            confirmed: info.your_plays,
            pending: Vec::new(),
        },
        total_plays: info.total_plays,
    };
    store.lobby_mut().phase = GamePhase::SelectingWhiteCards;
    store.roster_mut().reset_played();

    store.emit_lobby();
    store.emit_round();
    store.emit_roster();
}

// =========================================================================
// Tests
// =========================================================================
