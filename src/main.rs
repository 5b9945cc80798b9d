use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_tally::config::{self, Settings};
use board_tally::dom::layout;
use board_tally::models::BoardSnapshot;
use board_tally::points::Engine;
use board_tally::{api, render, service::BoardService};

#[derive(Parser)]
#[command(name = "board-tally")]
#[command(about = "Story point, post point and hour totals for kanban card titles")]
struct Cli {
    /// Settings file (defaults to the user's config directory)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a live board over HTTP
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "17020")]
        port: u16,

        /// Board snapshot (JSON) to start from; an empty board otherwise
        #[arg(short, long)]
        board: Option<PathBuf>,
    },
    /// Run one pass over a board snapshot and print the result
    Scan {
        /// Board snapshot (JSON)
        board: PathBuf,
    },
    /// Print the effective settings
    Settings {
        /// Also write them back, filling in defaults for missing keys
        #[arg(long)]
        save: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "board_tally=debug,tower_http=debug".into()),
    );

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load_from(path),
        None => Ok(Settings::load()),
    }
}

fn load_board(path: &Path) -> anyhow::Result<BoardSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse board file")
}

async fn serve(port: u16, board: Option<PathBuf>, settings: Settings) -> anyhow::Result<()> {
    let snapshot = match board {
        Some(path) => load_board(&path)?,
        None => BoardSnapshot {
            name: "Board".to_string(),
            lists: Vec::new(),
        },
    };
    tracing::info!(
        "Loaded board '{}' with {} lists",
        snapshot.name,
        snapshot.lists.len()
    );

    let service = BoardService::new(layout::build_board(&snapshot), settings);
    let app = api::create_router(service);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("board-tally listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Some(Commands::Serve { port, board }) => serve(port, board, settings).await?,
        Some(Commands::Scan { board }) => {
            let snapshot = load_board(&board)?;
            let mut doc = layout::build_board(&snapshot);
            let mut engine = Engine::new(settings);
            engine.recompute(&mut doc);

            print!("{}", render::render_tree(&render::board_view(&doc, engine.registry())));
        }
        Some(Commands::Settings { save }) => {
            match &cli.settings {
                Some(path) => println!("# {}", path.display()),
                None => match config::settings_path() {
                    Ok(path) => println!("# {}", path.display()),
                    Err(e) => println!("# {}", e),
                },
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);

            if save {
                match &cli.settings {
                    Some(path) => settings.save_to(path)?,
                    None => settings.save()?,
                }
                tracing::info!("Settings saved");
            }
        }
        None => serve(17020, None, settings).await?,
    }

    Ok(())
}
