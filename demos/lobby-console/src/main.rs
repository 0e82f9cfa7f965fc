//! A line-oriented console client: join a game, watch the state change,
//! and issue commands by typing them.
//!
//! Usage:
//!   lobby-console <server> <game-id> <player-id> [password]
//!
//! where `<server>` is a host:port like `localhost:9000`. Commands:
//!   start              start the game (owner only)
//!   play <id> [id...]  submit white cards by id
//!   pick <id> [id...]  czar: pick the winning bundle
//!   skip               czar: skip the black card
//!   kick <player-id>   czar: kick a player
//!   rounds <n>         set the max-rounds setting
//!   leave              leave the game and exit

use cardlink::{
    CardId, GameClient, GameEvent, PlayerId, SessionConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Event printing
// ---------------------------------------------------------------------------

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::Connected => println!("* connected"),
        GameEvent::Disconnected { reason } => match reason {
            Some(reason) => println!("* disconnected: {reason}"),
            None => println!("* disconnected"),
        },
        GameEvent::LobbyChanged(lobby) => {
            println!(
                "* lobby: owner={} phase={:?}",
                lobby.owner_id, lobby.phase
            );
        }
        GameEvent::SettingsChanged(settings) => {
            println!(
                "* settings: maxRounds={} toPoints={} maxPlayers={}",
                settings.max_rounds,
                settings.playing_to_points,
                settings.max_players
            );
        }
        GameEvent::RosterChanged(players) => {
            for p in players {
                println!(
                    "* player {} ({}): {} points{}{}",
                    p.name,
                    p.id,
                    p.points,
                    if p.connected { "" } else { " [offline]" },
                    if p.has_played { " [played]" } else { "" },
                );
            }
        }
        GameEvent::RoundChanged(round) => {
            println!("* round {} (czar {})", round.round_number, round.czar_id);
            if let Some(card) = &round.black_card {
                println!("  prompt: {}", card.body_text);
            }
            for card in &round.hand {
                println!("  [{}] {}", card.id.0, card.body_text);
            }
        }
        GameEvent::AllPlaysChanged(plays) => {
            for (i, bundle) in plays.iter().enumerate() {
                let texts: Vec<&str> = bundle
                    .iter()
                    .map(|c| c.body_text.as_str())
                    .collect();
                println!("* play {}: {}", i + 1, texts.join(" / "));
            }
        }
        GameEvent::CommandError { reason } if reason.is_empty() => {}
        GameEvent::CommandError { reason } => {
            println!("! rejected: {reason}");
        }
    }
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

fn parse_ids(args: &[&str]) -> Option<Vec<CardId>> {
    args.iter()
        .map(|a| a.parse().ok().map(CardId))
        .collect()
}

async fn run_command(
    client: &GameClient,
    line: &str,
) -> Result<bool, cardlink::CardlinkError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["start"] => client.start_game().await?,
        ["play", ids @ ..] => match parse_ids(ids) {
            Some(ids) if !ids.is_empty() => {
                client.play_cards(ids).await?;
            }
            _ => println!("! usage: play <id> [id...]"),
        },
        ["pick", ids @ ..] => match parse_ids(ids) {
            Some(ids) if !ids.is_empty() => {
                client.czar_select_cards(ids).await?;
            }
            _ => println!("! usage: pick <id> [id...]"),
        },
        ["skip"] => client.czar_skip_black_card().await?,
        ["kick", id] => {
            client.czar_kick_player(PlayerId((*id).to_string())).await?;
        }
        ["rounds", n] => match n.parse() {
            Ok(max_rounds) => {
                let mut settings = client.lobby().await.settings;
                settings.max_rounds = max_rounds;
                client.change_settings(settings).await?;
            }
            Err(_) => println!("! usage: rounds <n>"),
        },
        ["leave"] => {
            client.leave_game().await?;
            return Ok(true);
        }
        [] => {}
        _ => println!("! unknown command: {line}"),
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let [_, server, game_id, player_id, rest @ ..] = args.as_slice()
    else {
        eprintln!(
            "usage: lobby-console <server> <game-id> <player-id> [password]"
        );
        std::process::exit(2);
    };

    let client = GameClient::connect(SessionConfig {
        ws_url: format!("ws://{server}/api/ws"),
        leave_url: format!("http://{server}/api/game/leave"),
        game_id: game_id.clone(),
        player_id: player_id.clone(),
        password: rest.first().cloned(),
    })
    .await?;

    let mut events = client.subscribe().await;
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
            if matches!(event, GameEvent::Disconnected { .. }) {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match run_command(&client, &line).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => println!("! {e}"),
        }
    }

    printer.await?;
    Ok(())
}
