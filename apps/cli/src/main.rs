use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chess_client_core::{
    AutoPrompter, ClientError, ClientEvent, HttpGameApi, Prompter, SessionController,
};
use chess_shared::domain::{Color, TimeControl};
use clap::Parser;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod terminal;

use config::{load_settings, Overrides, Settings, SETTINGS_FILE};
use input::{parse_command, Command, LineQueue, StdinPrompter};

#[derive(Parser, Debug)]
#[command(about = "Play chess against a remote game server from the terminal")]
struct Args {
    #[arg(long, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    color: Option<Color>,
    #[arg(long)]
    time_control: Option<TimeControl>,
    /// Promote to queen and confirm resignation without asking.
    #[arg(long)]
    assume_yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(
        &args.config,
        Overrides {
            server_url: args.server_url,
            username: args.username,
            player_color: args.color,
            time_control: args.time_control,
        },
    );

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api = HttpGameApi::new(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    info!(server = %api.base_url(), username = %settings.username, "starting chess client");

    let lines = LineQueue::stdin();
    let prompter: Arc<dyn Prompter> = if args.assume_yes {
        Arc::new(AutoPrompter)
    } else {
        Arc::new(StdinPrompter::new(lines.clone()))
    };
    let controller = SessionController::new(Arc::new(api), prompter);

    let printer = spawn_event_printer(controller.clone());
    let clock = controller.spawn_clock_sync();

    println!("{}", terminal::HELP);
    let _ = controller
        .start_game(&settings.username, settings.player_color, settings.time_control)
        .await;

    while let Some(line) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => run_command(&controller, &settings, command).await,
            Err(err) => println!("{err}"),
        }
    }

    clock.abort();
    printer.abort();
    Ok(())
}

async fn run_command(controller: &Arc<SessionController>, settings: &Settings, command: Command) {
    // Request failures reach the player through the event stream.
    match command {
        Command::Click(square) => {
            let _ = controller.select_or_move(square).await;
        }
        Command::Move(from, to) => {
            if let Err(err @ ClientError::NotMovable(_)) = controller.play_move(from, to).await {
                println!("{err}");
            }
        }
        Command::New {
            color,
            time_control,
        } => {
            let current = controller.snapshot().await;
            let name = if current.game_id().is_some() {
                current.player_name().to_string()
            } else {
                settings.username.clone()
            };
            let _ = controller
                .start_game(
                    &name,
                    color.unwrap_or(current.player_color()),
                    time_control.unwrap_or(current.time_control()),
                )
                .await;
        }
        Command::Undo => {
            let _ = controller.undo().await;
        }
        Command::Resign => {
            let _ = controller.resign().await;
        }
        Command::Hint => {
            let _ = controller.request_hint().await;
        }
        Command::Flip => controller.flip_board().await,
        Command::Stats => {
            let name = controller.snapshot().await.player_name().to_string();
            if controller.load_stats(&name).await.is_ok() {
                println!("{}", terminal::draw(&controller.view().await));
            }
        }
        Command::Board => println!("{}", terminal::draw(&controller.view().await)),
        Command::Help => println!("{}", terminal::HELP),
        Command::Quit => {}
    }
}

/// Redraws when the board text changes; clock-only ticks are not reprinted.
fn spawn_event_printer(controller: Arc<SessionController>) -> JoinHandle<()> {
    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        let mut last_board = String::new();
        loop {
            match events.recv().await {
                Ok(ClientEvent::StateChanged) => {
                    let view = controller.view().await;
                    let board = terminal::draw_board(&view);
                    if board != last_board {
                        println!("\n{}\n{}", board, terminal::clock_line(&view));
                        last_board = board;
                    }
                }
                Ok(ClientEvent::Notice(message)) => println!("** {message}"),
                Ok(ClientEvent::Error(notice)) => println!("!! {}", notice.message),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}
