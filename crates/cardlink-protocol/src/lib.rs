//! Wire protocol for Cardlink.
//!
//! This crate defines the "language" that the game server speaks to its
//! clients:
//!
//! - **Types** ([`Player`], [`GameSettings`], [`WhiteCard`], [`BlackCard`],
//!   [`GameStateInfo`], etc.) — the structures that travel on the wire.
//! - **Messages** ([`Message`]) — one sum type over every tagged message in
//!   the protocol, both server→client and client→server.
//! - **Codec** ([`encode`], [`decode`]) — conversion between [`Message`]
//!   and the JSON envelope `{"type": <int>, "data": <object>}`.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (text frames) and state
//! (the local replicas). It doesn't know about connections or game
//! reconciliation — it only knows how to serialize and deserialize
//! messages.
//!
//! ```text
//! Transport (text frame) → Protocol (Message) → Engine (reconciliation)
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::{decode, encode};
pub use error::ProtocolError;
pub use message::{
    BlackCardSkipped, CardPlayed, CommandRejected, CzarJudgingPhase,
    CzarSelectCard, GameEnded, Joined, KickPlayer, Message, OwnerChanged,
    PlayCards, PlayerCreated, PlayerDisconnected, PlayerJoined, PlayerLeft,
    RoundInformation, SettingsUpdate, WhiteCardPlayPhase, tag,
};
pub use types::{
    BlackCard, CardId, GamePhase, GameSettings, GameStateInfo,
    JoinRoundInfo, Player, PlayerId, UNRESOLVED_CARD_BODY, WhiteCard,
};
