//! `penguin` - play chess against a remote opponent from the terminal
//!
//! ```text
//! penguin create --color white     open a room and print its join code
//! penguin join AB12CD              join a room (a share link works too)
//! penguin local                    both sides on one board, no server
//! ```
//!
//! Settings come from `settings.json` in the config directory, then `.env`
//! and `PENGUIN_*` variables, then the flags below.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use penguin_chess::core::settings::{load_settings, ClientSettings};
use penguin_chess::game::systems::{BoardInput, InteractionOutcome};
use penguin_chess::game::types::Color;
use penguin_chess::game::GameSession;
use penguin_chess::input::pointer::BoardRect;
use penguin_chess::networking::{ClientNotice, GameClient, JoinCode, Link, WsLink};
use penguin_chess::ui::terminal::{self, BoardMarks, Command, HELP};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "penguin", version, about = "Two-player chess over a relay server")]
struct Cli {
    /// Relay server WebSocket URL
    #[arg(long, global = true)]
    server: Option<String>,

    /// Display name shown to the opponent
    #[arg(long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Create a room and wait for an opponent
    Create {
        #[arg(long, value_enum, default_value_t = Side::White)]
        color: Side,
    },
    /// Join a room by code or share link
    Join { code: String },
    /// Play both sides locally
    Local,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = load_settings();
    settings.apply_env_overrides();
    if let Some(server) = cli.server.clone() {
        settings.server_url = server;
    }
    if let Some(name) = cli.name.clone() {
        settings.player_name = name;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    settings.validate().context("invalid settings")?;
    info!("Starting penguin as {}", settings.player_name);

    match cli.mode {
        Mode::Local => run_local(&settings).await,
        Mode::Create { color } => run_online(&settings, Lobby::Create(color.into())).await,
        Mode::Join { code } => {
            let code = JoinCode::from_input(&code).context("bad join code")?;
            run_online(&settings, Lobby::Join(code)).await
        }
    }
}

enum Lobby {
    Create(Color),
    Join(JoinCode),
}

fn board_rect(settings: &ClientSettings) -> BoardRect {
    BoardRect::square(settings.board_size)
}

fn print_board(game: &GameSession) {
    let marks = BoardMarks {
        destinations: game.interaction().legal_destinations(),
        recent: game.recent_move(),
    };
    println!(
        "{}",
        terminal::render_board(&game.board_snapshot(), game.interaction().orientation(), &marks)
    );
    println!("{} to move", game.side_to_move().name());
}

fn print_status(game: &GameSession) {
    let status = game.status();
    if status.is_over() {
        println!("{}", status.message());
    } else {
        println!("{} to move", game.side_to_move().name());
    }
}

fn print_captures(game: &GameSession) {
    println!(
        "{}",
        terminal::render_captures(|color| game.captured_pieces(color), game.material_advantage())
    );
}

fn report(outcome: &InteractionOutcome, game: &GameSession) {
    match outcome {
        InteractionOutcome::Committed(local) => {
            println!("{} played {}", local.mover.name(), local.mv);
            print_board(game);
            if game.is_game_over() {
                print_status(game);
            }
        }
        InteractionOutcome::PromotionRequired { .. } => println!("Promote to? (promote q|r|b|n)"),
        InteractionOutcome::Selected(square) => {
            println!("Selected {}", square);
            print_board(game);
        }
        InteractionOutcome::Reset => println!("Not a legal move"),
        InteractionOutcome::Rejected(err) => println!("{}", err),
        InteractionOutcome::Ignored => {
            if game.is_game_over() {
                println!("The game is over");
            } else if !game.is_local_turn() {
                println!("Not your turn");
            }
        }
        InteractionOutcome::Dragging { .. } | InteractionOutcome::Released => {}
    }
}

/// Board inputs for a move or click command
fn script_for(command: Command, game: &GameSession) -> Option<Vec<BoardInput>> {
    let board = *game.interaction().board();
    let orientation = game.interaction().orientation();
    match command {
        Command::Move(mv) => Some(terminal::drag_script(mv, &board, orientation)),
        Command::Click(square) => Some(terminal::click_script(square, &board, orientation)),
        Command::Promote(piece) => Some(vec![BoardInput::ChoosePromotion(piece)]),
        _ => None,
    }
}

async fn run_local(settings: &ClientSettings) -> Result<()> {
    let mut game = GameSession::new(board_rect(settings));
    game.subscribe_status(|state, _| info!("[STATUS] {}", state.message()));
    print_board(&game);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Board => print_board(&game),
            Command::Captures => print_captures(&game),
            Command::Status => print_status(&game),
            Command::Leave => println!("Not in a room"),
            _ => {
                for input in script_for(command, &game).unwrap_or_default() {
                    let outcome = game.handle_input(input);
                    report(&outcome, &game);
                }
            }
        }
    }
    Ok(())
}

async fn run_online(settings: &ClientSettings, lobby: Lobby) -> Result<()> {
    let (events_tx, mut events) = unbounded_channel();
    let link = WsLink::new(&settings.server_url, events_tx)?;
    let mut client = GameClient::new(link, board_rect(settings), settings.player_name.clone());

    match &lobby {
        Lobby::Create(color) => client.create_game(*color)?,
        Lobby::Join(code) => client.join_game(code)?,
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Err(err) = client.handle_link_event(event) {
                    error!("[NETWORK] {}", err);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_command(&mut client, &line) {
                    break;
                }
            }
        }
        for notice in client.take_notices() {
            show_notice(&notice, &client, settings);
        }
    }

    client.leave_game()?;
    Ok(())
}

/// Run one command line; `false` means quit
fn handle_command<L: Link>(client: &mut GameClient<L>, line: &str) -> bool {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(err) => {
            println!("{}", err);
            return true;
        }
    };
    match command {
        Command::Quit => return false,
        Command::Help => println!("{}", HELP),
        Command::Board => print_board(client.game()),
        Command::Captures => print_captures(client.game()),
        Command::Status => print_status(client.game()),
        Command::Leave => {
            if let Err(err) = client.leave_game() {
                error!("[LOBBY] {}", err);
            }
        }
        _ => {
            for input in script_for(command, client.game()).unwrap_or_default() {
                match client.handle_input(input) {
                    Ok(outcome) => report(&outcome, client.game()),
                    Err(err) => error!("[NETWORK] {}", err),
                }
            }
        }
    }
    true
}

fn show_notice<L: Link>(notice: &ClientNotice, client: &GameClient<L>, settings: &ClientSettings) {
    match notice {
        ClientNotice::Connected => info!("[NETWORK] Connected to {}", settings.server_url),
        ClientNotice::Disconnected => println!("Connection lost, retrying..."),
        ClientNotice::RoomCreated { room_id, color } => {
            println!("Room created. Join code: {} (you play {})", room_id, color.name());
            print_board(client.game());
        }
        ClientNotice::JoinedRoom { host, .. } => {
            println!("Joined {}'s game", host.name);
            print_board(client.game());
        }
        ClientNotice::LeftRoom => println!("Left the room"),
        ClientNotice::OpponentJoined(opponent) => println!("{} joined", opponent.name),
        ClientNotice::OpponentLeft => println!("Your opponent disconnected"),
        ClientNotice::OpponentMoved(mv) => {
            println!("Opponent played {}", mv);
            print_board(client.game());
        }
        ClientNotice::GameOver(status) => println!("{}", status.message()),
        ClientNotice::RequestFailed { action, reason } => println!("{} failed: {}", action, reason),
    }
}
