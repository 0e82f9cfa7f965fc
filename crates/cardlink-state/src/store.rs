//! The `GameStore`: one session's replicas plus its observers.

use cardlink_protocol::{GameSettings, Player, PlayerId, WhiteCard};
use tokio::sync::mpsc;

use crate::{GameEvent, LobbyState, Roster, RoundState};

/// The opaque strings that bootstrap a session. The store never
/// interprets them beyond comparing `player_id` against the lobby owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    pub game_id: String,
    pub player_id: PlayerId,
    pub password: Option<String>,
}

/// A subscriber's end of the event bus. Dropping it unsubscribes.
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;

/// Exclusive owner of the three replica slices.
///
/// Mutation flows through [`lobby_mut`](Self::lobby_mut) /
/// [`round_mut`](Self::round_mut) / [`roster_mut`](Self::roster_mut),
/// which only the reconciliation dispatcher (and the optimistic play
/// path) call. Everything else reads snapshots.
///
/// The store is not internally synchronized: in a multi-threaded host it
/// lives behind a single mutex, which preserves the guarantee that
/// effects apply in frame-arrival order.
#[derive(Default)]
pub struct GameStore {
    session: SessionInfo,
    lobby: LobbyState,
    round: RoundState,
    roster: Roster,
    observers: Vec<mpsc::UnboundedSender<GameEvent>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Session lifecycle --------------------------------------------------

    /// Reinitializes every slice for a fresh join attempt. Called exactly
    /// once per join, before the transport connects, so no stale state is
    /// visible during (re)connection.
    ///
    /// Registered observers are PRESERVED: they keep receiving events and
    /// will simply observe the new session. (The reference implementation
    /// dropped them here, which lost listeners across reconnects.)
    pub fn reset(
        &mut self,
        game_id: String,
        player_id: PlayerId,
        password: Option<String>,
    ) {
        if !self.observers.is_empty() {
            tracing::warn!(
                observers = self.observers.len(),
                game_id = %game_id,
                "store reset with live observers; they will observe the \
                 new session"
            );
        }

        self.session = SessionInfo {
            game_id,
            player_id,
            password,
        };
        self.lobby = LobbyState::default();
        self.round = RoundState::default();
        self.roster = Roster::default();
    }

    // -- Snapshot accessors (defensive copies) ------------------------------

    pub fn lobby(&self) -> LobbyState {
        self.lobby.clone()
    }

    pub fn round(&self) -> RoundState {
        self.round.clone()
    }

    pub fn player_list(&self) -> Vec<Player> {
        self.roster.list()
    }

    /// Whether the local player owns the lobby.
    pub fn is_owner(&self) -> bool {
        !self.session.player_id.is_empty()
            && self.session.player_id == self.lobby.owner_id
    }

    pub fn player_id(&self) -> PlayerId {
        self.session.player_id.clone()
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    // -- Mutation access (dispatcher only) ----------------------------------

    pub fn lobby_mut(&mut self) -> &mut LobbyState {
        &mut self.lobby
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.round
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    // -- Observers ----------------------------------------------------------

    /// Registers an observer. Events arrive in emission order; dropping
    /// the receiver unsubscribes (pruned on the next emission).
    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Broadcasts one event to every live observer.
    pub fn emit(&mut self, event: GameEvent) {
        self.observers
            .retain(|observer| observer.send(event.clone()).is_ok());
    }

    pub fn emit_lobby(&mut self) {
        let snapshot = self.lobby();
        self.emit(GameEvent::LobbyChanged(snapshot));
    }

    pub fn emit_round(&mut self) {
        let snapshot = self.round();
        self.emit(GameEvent::RoundChanged(snapshot));
    }

    pub fn emit_roster(&mut self) {
        let snapshot = self.player_list();
        self.emit(GameEvent::RosterChanged(snapshot));
    }

    pub fn emit_settings(&mut self, settings: GameSettings) {
        self.emit(GameEvent::SettingsChanged(settings));
    }

    pub fn emit_all_plays(&mut self, plays: Vec<Vec<WhiteCard>>) {
        self.emit(GameEvent::AllPlaysChanged(plays));
    }

    pub fn emit_command_error(&mut self, reason: String) {
        self.emit(GameEvent::CommandError { reason });
    }

    /// Re-broadcasts the current snapshots unconditionally, so observers
    /// that subscribed after reconciliation already happened have no
    /// missed-update window.
    pub fn emit_all(&mut self) {
        self.emit_lobby();
        self.emit_roster();
        self.emit_round();
    }
}

// =========================================================================
// Tests
// =========================================================================
