//! Local replicas of server-authoritative game state.
//!
//! This crate owns the three replica slices — [`LobbyState`],
//! [`RoundState`], and the player roster — behind one [`GameStore`].
//! Nothing outside the store mutates a slice directly: the reconciliation
//! dispatcher calls the store's mutation methods, and everything else
//! reads through snapshot accessors that hand out clones (observers can
//! never corrupt the authoritative replica through a snapshot).
//!
//! Change notifications go out as [`GameEvent`]s over per-subscriber
//! channels; see [`GameStore::subscribe`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Engine (above)    ← reconciles wire messages into the store
//!     ↕
//! State (this crate) ← owns the replicas, emits change events
//!     ↕
//! Protocol (below)  ← provides the wire types the replicas are built from
//! ```

mod event;
mod lobby;
mod roster;
mod round;
mod store;

pub use event::GameEvent;
pub use lobby::LobbyState;
pub use roster::Roster;
pub use round::{Plays, RoundState};
pub use store::{EventReceiver, GameStore, SessionInfo};
