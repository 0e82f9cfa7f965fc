//! Change notifications handed to observers.

use cardlink_protocol::{GameSettings, Player, WhiteCard};

use crate::{LobbyState, RoundState};

/// What observers receive when a slice changes.
///
/// Every payload is a snapshot clone — holding on to one never aliases
/// the live replica. `SettingsChanged` is deliberately distinct from
/// `LobbyChanged` (which also fires on a settings update): it lets a UI
/// tell a remote settings edit apart from its own local save and clear a
/// "dirty/unsaved" indicator only for the former.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The lobby slice changed (ownership, settings, phase).
    LobbyChanged(LobbyState),
    /// The settings sub-object was replaced by a remote edit.
    SettingsChanged(GameSettings),
    /// The round slice changed.
    RoundChanged(RoundState),
    /// The roster changed (join/leave/connect/points/has-played).
    RosterChanged(Vec<Player>),
    /// Anonymized play bundles for judging display.
    AllPlaysChanged(Vec<Vec<WhiteCard>>),
    /// The server rejected a command. An empty reason clears a previously
    /// shown error (commands emit it optimistically before sending).
    CommandError { reason: String },
    /// The transport came up.
    Connected,
    /// The transport went away. Terminal for the session. The reason is
    /// the last transport error before the close, if there was one.
    Disconnected { reason: Option<String> },
}
