//! The round slice: prompt card, hand, plays, progress.

use cardlink_protocol::{BlackCard, CardId, PlayerId, WhiteCard};

/// The local player's plays, in two phases.
///
/// `confirmed` is what the server has acknowledged (installed by the join
/// and round messages); `pending` is the optimistic local selection made
/// through the play command before the server echoes it. Server-driven
/// replacements always clear `pending`, which is what makes
/// reconciliation-on-conflict well-defined: the authoritative value simply
/// wins once it arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plays {
    pub confirmed: Vec<WhiteCard>,
    pub pending: Vec<WhiteCard>,
}

impl Plays {
    /// The plays the UI should treat as "mine this round": the pending
    /// selection if one exists, otherwise the confirmed one.
    pub fn committed(&self) -> &[WhiteCard] {
        if self.pending.is_empty() {
            &self.confirmed
        } else {
            &self.pending
        }
    }

    pub fn clear(&mut self) {
        self.confirmed.clear();
        self.pending.clear();
    }
}

/// Replica of the in-progress round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    /// Monotonic within a game; 0 before the first round.
    pub round_number: u32,
    pub czar_id: PlayerId,
    /// The active prompt. `None` while in the lobby.
    pub black_card: Option<BlackCard>,
    /// The local player's dealt hand; ids unique within it.
    pub hand: Vec<WhiteCard>,
    pub plays: Plays,
    /// How many players have already submitted this round.
    pub total_plays: u32,
}

impl RoundState {
    /// How many response cards the active prompt requires; 0 with no
    /// prompt (no play can be made then anyway).
    pub fn cards_to_play(&self) -> usize {
        self.black_card
            .as_ref()
            .map_or(0, |card| card.cards_to_play)
    }

    /// Resolves a card id against the hand, falling back to a
    /// placeholder card for display when the id is unknown.
    pub fn resolve(&self, id: CardId) -> WhiteCard {
        self.hand
            .iter()
            .find(|card| card.id == id)
            .cloned()
            .unwrap_or_else(|| WhiteCard::unresolved(id))
    }

    /// Clears the fields that only mean something mid-round. Keeps the
    /// round number (it is a monotonic counter, not transient state).
    pub fn clear_transient(&mut self) {
        self.czar_id = PlayerId::default();
        self.black_card = None;
        self.hand.clear();
        self.plays.clear();
        self.total_plays = 0;
    }
}
