//! The client facade: session bootstrap, the run loop, and the command
//! API.
//!
//! A [`GameClient`] is constructed explicitly and owns everything for one
//! session: the store behind its single lock, the transport handle, and
//! the spawned run loop that drains transport events in arrival order.
//! There is no global instance; hosts that want one client per game create
//! one client per game.

use std::sync::Arc;

use tokio::sync::Mutex;

use cardlink_protocol::{
    CardId, CzarSelectCard, GameSettings, KickPlayer, Message, PlayCards,
    PlayerId, SettingsUpdate,
};
use cardlink_state::{
    EventReceiver, GameEvent, GameStore, LobbyState, RoundState,
};
use cardlink_transport::{TransportEvent, WsHandle, WsTransport};

use crate::dispatch;
use crate::error::CardlinkError;

/// Everything needed to join one game.
///
/// All fields are opaque strings supplied by the host; the client does not
/// parse or validate them beyond URL assembly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint, e.g. `ws://host/api/ws`.
    pub ws_url: String,
    /// HTTP endpoint for the out-of-band leave call, e.g.
    /// `http://host/api/game/leave`.
    pub leave_url: String,
    pub game_id: String,
    pub player_id: String,
    pub password: Option<String>,
}

impl SessionConfig {
    /// The connect URL: the endpoint plus identifying query parameters.
    /// Ids and passwords are opaque strings and may contain query
    /// metacharacters, so they go through percent-encoding.
    ///
    /// # Errors
    /// [`CardlinkError::BadUrl`] if `ws_url` is not a valid URL.
    fn connect_url(&self) -> Result<String, CardlinkError> {
        let mut url = url::Url::parse(&self.ws_url)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("gameId", &self.game_id)
                .append_pair("playerId", &self.player_id);
            if let Some(password) = &self.password {
                query.append_pair("password", password);
            }
        }
        Ok(url.into())
    }
}

/// One game session: replicas, subscriptions, and commands.
///
/// Cheap to share (`Arc` internally is not needed; methods take `&self`
/// and the client itself is usually wrapped in an `Arc` by the host).
pub struct GameClient {
    store: Arc<Mutex<GameStore>>,
    handle: Mutex<Option<WsHandle>>,
    http: reqwest::Client,
    config: SessionConfig,
}

impl GameClient {
    /// Opens the WebSocket, resets the store for the new session, and
    /// spawns the run loop.
    ///
    /// # Errors
    /// [`CardlinkError::Transport`] if the connection cannot be opened.
    pub async fn connect(
        config: SessionConfig,
    ) -> Result<Self, CardlinkError> {
        let store = Arc::new(Mutex::new(GameStore::new()));
        store.lock().await.reset(
            config.game_id.clone(),
            PlayerId(config.player_id.clone()),
            config.password.clone(),
        );

        let (handle, events) =
            WsTransport::connect(&config.connect_url()?).await?;
        tracing::info!(
            game_id = %config.game_id,
            player_id = %config.player_id,
            "session opened"
        );

        tokio::spawn(run_loop(
            Arc::clone(&store),
            handle.clone(),
            events,
        ));

        Ok(Self {
            store,
            handle: Mutex::new(Some(handle)),
            http: reqwest::Client::new(),
            config,
        })
    }

    // -- Subscriptions and snapshots ----------------------------------------

    /// Registers an observer. Events arrive in reconciliation order; the
    /// receiver stays valid across a store reset.
    pub async fn subscribe(&self) -> EventReceiver {
        self.store.lock().await.subscribe()
    }

    pub async fn lobby(&self) -> LobbyState {
        self.store.lock().await.lobby()
    }

    pub async fn round(&self) -> RoundState {
        self.store.lock().await.round()
    }

    pub async fn player_list(&self) -> Vec<cardlink_protocol::Player> {
        self.store.lock().await.player_list()
    }

    /// Whether the local player currently owns the lobby.
    pub async fn is_owner(&self) -> bool {
        self.store.lock().await.is_owner()
    }

    // -- Commands ------------------------------------------------------------

    /// Asks the server to start the game (owner only, server-enforced).
    pub async fn start_game(&self) -> Result<(), CardlinkError> {
        self.command(Message::StartGame).await
    }

    /// Proposes new lobby settings. The server echoes them back (or
    /// rejects with a command error); nothing changes locally until then.
    pub async fn change_settings(
        &self,
        settings: GameSettings,
    ) -> Result<(), CardlinkError> {
        self.command(Message::ChangeSettings(SettingsUpdate { settings }))
            .await
    }

    /// Submits response cards for the current prompt.
    ///
    /// The ids append to the pending plays; once the prompt's
    /// required-card count is reached, the oldest picks are trimmed so
    /// exactly the newest ones remain, in pick order. The trimmed set is
    /// what goes on the wire and what `RoundChanged` reports.
    pub async fn play_cards(
        &self,
        ids: Vec<CardId>,
    ) -> Result<(), CardlinkError> {
        let handle = self.live_handle().await?;

        let card_ids = {
            let mut store = self.store.lock().await;
            store.emit_command_error(String::new());

            let round = store.round_mut();
            let cap = round.cards_to_play();
            let mut picks: Vec<CardId> = round
                .plays
                .pending
                .iter()
                .map(|card| card.id)
                .collect();
            picks.extend(ids);
            if cap > 0 && picks.len() > cap {
                picks.drain(..picks.len() - cap);
            }

            let resolved: Vec<_> =
                picks.iter().map(|&id| round.resolve(id)).collect();
            round.plays.pending = resolved;
            store.emit_round();
            picks
        };

        self.send(&handle, Message::PlayCards(PlayCards { card_ids }))
            .await
    }

    /// Czar only: picks the winning play bundle by its card ids.
    pub async fn czar_select_cards(
        &self,
        cards: Vec<CardId>,
    ) -> Result<(), CardlinkError> {
        self.command(Message::CzarSelectCard(CzarSelectCard { cards }))
            .await
    }

    /// Czar only: discards the current prompt for a fresh one.
    pub async fn czar_skip_black_card(&self) -> Result<(), CardlinkError> {
        self.command(Message::SkipBlackCard).await
    }

    /// Czar only: removes a player from the game.
    pub async fn czar_kick_player(
        &self,
        player_id: PlayerId,
    ) -> Result<(), CardlinkError> {
        self.command(Message::KickPlayer(KickPlayer { player_id }))
            .await
    }

    /// Leaves the game: notifies the server out of band, then closes the
    /// socket. The HTTP call is best-effort; the close happens regardless.
    ///
    /// # Errors
    /// [`CardlinkError::NotConnected`] if already disconnected.
    pub async fn leave_game(&self) -> Result<(), CardlinkError> {
        let handle = self
            .handle
            .lock()
            .await
            .take()
            .ok_or(CardlinkError::NotConnected)?;

        let result = self
            .http
            .delete(&self.config.leave_url)
            .query(&[
                ("gameId", self.config.game_id.as_str()),
                ("playerId", self.config.player_id.as_str()),
            ])
            .send()
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "leave notification failed");
        }

        handle.disconnect().await;
        Ok(())
    }

    // -- Internals -----------------------------------------------------------

    /// The common command path: clear the cached error, encode, send.
    async fn command(&self, msg: Message) -> Result<(), CardlinkError> {
        let handle = self.live_handle().await?;
        self.store
            .lock()
            .await
            .emit_command_error(String::new());
        self.send(&handle, msg).await
    }

    async fn live_handle(&self) -> Result<WsHandle, CardlinkError> {
        self.handle
            .lock()
            .await
            .as_ref()
            .filter(|h| h.is_open())
            .cloned()
            .ok_or(CardlinkError::NotConnected)
    }

    async fn send(
        &self,
        handle: &WsHandle,
        msg: Message,
    ) -> Result<(), CardlinkError> {
        let frame = cardlink_protocol::encode(&msg)?;
        tracing::debug!(tag = msg.tag(), "sending command");
        handle.send(&frame).await?;
        Ok(())
    }
}

/// Drains transport events in arrival order until the connection ends.
///
/// One task per connection; because it is the only consumer of the
/// channel, reconciliation is strictly FIFO in frame order.
async fn run_loop(
    store: Arc<Mutex<GameStore>>,
    handle: WsHandle,
    mut events: tokio::sync::mpsc::UnboundedReceiver<TransportEvent>,
) {
    let mut last_error: Option<String> = None;

    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Connected => {
                store.lock().await.emit(GameEvent::Connected);
            }
            TransportEvent::Received(frame) => {
                if let Some(reply) = reconcile(&store, &frame).await {
                    match cardlink_protocol::encode(&reply) {
                        Ok(text) => {
                            if let Err(e) = handle.send(&text).await {
                                tracing::warn!(
                                    error = %e,
                                    "reply send failed"
                                );
                            }
                        }
                        Err(e) => tracing::warn!(
                            error = %e,
                            tag = reply.tag(),
                            "reply encode failed"
                        ),
                    }
                }
            }
            TransportEvent::Error(reason) => {
                tracing::error!(%reason, "transport error");
                last_error = Some(reason);
            }
            TransportEvent::Disconnected => {
                store.lock().await.emit(GameEvent::Disconnected {
                    reason: last_error.take(),
                });
                break;
            }
        }
    }
    tracing::debug!("run loop ended");
}

/// Decodes and applies one frame. Malformed or out-of-place frames are
/// logged and skipped; a bad frame never takes the session down.
async fn reconcile(
    store: &Arc<Mutex<GameStore>>,
    frame: &str,
) -> Option<Message> {
    let msg = match cardlink_protocol::decode(frame) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!(error = %e, "dropping undecodable frame");
            return None;
        }
    };

    let mut store = store.lock().await;
    match dispatch::apply(&mut store, msg) {
        Ok(outcome) => outcome.reply,
        Err(e) => {
            tracing::warn!(error = %e, "dropping unreconcilable message");
            None
        }
    }
}
