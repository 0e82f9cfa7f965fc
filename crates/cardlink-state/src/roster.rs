//! The player roster slice.
//!
//! An ordered list of player records keyed by server-assigned id. All
//! mutations are idempotent upserts or keyed no-ops, which is what keeps
//! the uniqueness invariant trivially true: there is exactly one code
//! path that inserts, and it checks for the id first.

use cardlink_protocol::{Player, PlayerId};

/// The ordered set of players in the game.
///
/// Invariant: player ids are unique. A player may exist here while
/// disconnected (`connected == false`); records are removed only by
/// [`Roster::remove`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Replaces the whole roster from a server snapshot, dropping any
    /// duplicate ids after the first.
    pub fn replace(&mut self, players: Vec<Player>) {
        self.players.clear();
        for player in players {
            if self.find(&player.id).is_none() {
                self.players.push(player);
            } else {
                tracing::warn!(
                    id = %player.id,
                    "duplicate player id in server snapshot, keeping first"
                );
            }
        }
    }

    /// A player joined (or re-joined). Inserts a fresh record if the id
    /// is new — the display name falls back to the id when the server
    /// did not send one — and flips `connected` on either way.
    /// Applying the same join twice is a no-op after the first.
    pub fn joined(&mut self, id: PlayerId, name: Option<String>) {
        match self.find_mut(&id) {
            Some(player) => player.connected = true,
            None => {
                let name = name.unwrap_or_else(|| id.0.clone());
                self.players.push(Player {
                    id,
                    name,
                    connected: true,
                    points: 0,
                    has_played: false,
                });
            }
        }
    }

    /// A player record was created server-side (not yet connected).
    /// Replaces any stale record with the same id.
    pub fn created(&mut self, id: PlayerId, name: String) {
        self.players.retain(|p| p.id != id);
        self.players.push(Player {
            id,
            name,
            connected: false,
            points: 0,
            has_played: false,
        });
    }

    /// Marks a player disconnected. The record stays. Unknown id: no-op.
    pub fn disconnected(&mut self, id: &PlayerId) {
        if let Some(player) = self.find_mut(id) {
            player.connected = false;
        }
    }

    /// Deletes a player's record. Unknown id: no-op.
    pub fn remove(&mut self, id: &PlayerId) {
        self.players.retain(|p| &p.id != id);
    }

    /// Marks that a player has submitted this round. Unknown id: no-op.
    pub fn mark_played(&mut self, id: &PlayerId) {
        if let Some(player) = self.find_mut(id) {
            player.has_played = true;
        }
    }

    /// Clears every member's `has_played` — the start-of-round reset.
    pub fn reset_played(&mut self) {
        for player in &mut self.players {
            player.has_played = false;
        }
    }

    /// Awards the round win: one point, and the winner's `has_played`
    /// is cleared. Unknown id: no-op.
    pub fn award_point(&mut self, id: &PlayerId) {
        if let Some(player) = self.find_mut(id) {
            player.points += 1;
            player.has_played = false;
        }
    }

    /// Snapshot of the roster in join order.
    pub fn list(&self) -> Vec<Player> {
        self.players.clone()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn find(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn find_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }
}

// =========================================================================
// Tests
// =========================================================================
