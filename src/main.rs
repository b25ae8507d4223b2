use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use llmchess::core::{ArenaConfig, FileKeyValueStore, GameStore};
use llmchess::game::ai::{players_from_config, Players, ScriptedProvider};
use llmchess::game::resources::CapturedPieces;
use llmchess::game::ChessGame;
use llmchess::rendering::TextBoard;
use llmchess::ui::view::format_material;
use llmchess::ui::{Arena, ArenaMode, TerminalView};

/// Watch two language models play chess against each other.
#[derive(Parser)]
#[command(name = "llmchess", version, about = "Watch two language models play chess")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding session.json (defaults to the user data directory)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Play a game between the configured providers (default)
    Play {
        /// Start immediately instead of waiting for 'start'
        #[arg(long)]
        autostart: bool,
    },
    /// Replay Byrne vs Fischer, 1956, with simulated thinking
    Replay {
        #[arg(long)]
        autostart: bool,

        /// Name shown for White
        #[arg(long, default_value = "GPT-4")]
        white_name: String,

        /// Name shown for Black
        #[arg(long, default_value = "Gemini-AI")]
        black_name: String,
    },
    /// Delete the saved game
    Reset,
    /// Print the saved game
    Show,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(state_dir: Option<&PathBuf>) -> GameStore {
    match state_dir {
        Some(dir) => GameStore::new(FileKeyValueStore::in_dir(dir)),
        None => GameStore::new(FileKeyValueStore::default_location()),
    }
}

fn show_saved(store: &GameStore) -> Result<()> {
    let Some(saved) = store.load() else {
        println!("No saved game.");
        return Ok(());
    };

    let game = ChessGame::from_pgn(&saved.pgn).context("saved game is corrupt")?;
    let captured = CapturedPieces {
        white_captured: saved.white_captured,
        black_captured: saved.black_captured,
    };
    println!("{}", TextBoard::new().render(game.board()));
    println!("PGN: {}", game.pgn());
    println!("FEN: {}", game.fen());
    println!(
        "Captured by White: {}",
        CapturedPieces::display(&captured.black_captured)
    );
    println!(
        "Captured by Black: {}",
        CapturedPieces::display(&captured.white_captured)
    );
    println!("Material: {}", format_material(captured.material_advantage()));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    llmchess::core::config::load_dotenv();
    let config = ArenaConfig::load(cli.config.as_deref())
        .with_context(|| format!("loading config from {:?}", cli.config))?;
    let store = open_store(cli.state_dir.as_ref());

    let (players, mode, autostart) = match cli.command.unwrap_or(Mode::Play { autostart: false }) {
        Mode::Reset => {
            store.clear();
            println!("Saved game cleared.");
            return Ok(());
        }
        Mode::Show => return show_saved(&store),
        Mode::Play { autostart } => (
            players_from_config(&config).context("building move providers")?,
            ArenaMode::Play,
            autostart,
        ),
        Mode::Replay {
            autostart,
            white_name,
            black_name,
        } => (
            // Only the names are used; the replay reads the script itself
            Players::new(
                Box::new(ScriptedProvider::new(white_name, &[])),
                Box::new(ScriptedProvider::new(black_name, &[])),
            ),
            ArenaMode::Replay(ScriptedProvider::byrne_fischer("Byrne vs Fischer, 1956")),
            autostart,
        ),
    };

    let view = Arc::new(TerminalView::new(config.board_width));
    let arena = Arena::new(players, view, store, config.timing.clone(), mode);
    arena
        .run(BufReader::new(tokio::io::stdin()), autostart)
        .await
        .context("reading commands")?;
    Ok(())
}
