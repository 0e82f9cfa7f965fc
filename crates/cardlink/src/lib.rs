//! # Cardlink
//!
//! Client synchronization engine for a real-time party card game.
//!
//! Cardlink owns one WebSocket session per game: it decodes the server's
//! integer-tagged JSON messages, reconciles them into three
//! server-authoritative replicas (lobby, round, roster), and broadcasts
//! change events to registered observers. Hosts drive the game through
//! the [`GameClient`] command API; they never mutate the replicas
//! directly.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cardlink::{GameClient, SessionConfig};
//!
//! # async fn run() -> Result<(), cardlink::CardlinkError> {
//! let client = GameClient::connect(SessionConfig {
//!     ws_url: "ws://localhost:9000/api/ws".into(),
//!     leave_url: "http://localhost:9000/api/game/leave".into(),
//!     game_id: "g1".into(),
//!     player_id: "p1".into(),
//!     password: None,
//! })
//! .await?;
//!
//! let mut events = client.subscribe().await;
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod dispatch;
mod error;

pub use client::{GameClient, SessionConfig};
pub use error::CardlinkError;

// The vocabulary types hosts need to speak the API.
pub use cardlink_protocol::{
    BlackCard, CardId, GamePhase, GameSettings, Player, PlayerId, WhiteCard,
};
pub use cardlink_state::{
    EventReceiver, GameEvent, LobbyState, RoundState,
};
