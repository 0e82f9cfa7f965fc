//! The lobby slice: ownership, settings, phase.

use cardlink_protocol::{GamePhase, GameSettings, PlayerId};
use time::OffsetDateTime;

/// Replica of the lobby-level game state.
///
/// Replaced wholesale on (re)join; individual fields are updated by the
/// settings-changed, new-owner, and phase-transition messages.
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyState {
    pub owner_id: PlayerId,
    pub settings: GameSettings,
    pub created_at: OffsetDateTime,
    pub phase: GamePhase,
}

impl Default for LobbyState {
    fn default() -> Self {
        Self {
            owner_id: PlayerId::default(),
            settings: GameSettings::default(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            phase: GamePhase::InLobby,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lobby_is_empty_and_in_lobby_phase() {
        let lobby = LobbyState::default();
        assert!(lobby.owner_id.is_empty());
        assert_eq!(lobby.phase, GamePhase::InLobby);
        assert_eq!(lobby.settings, GameSettings::default());
    }
}
