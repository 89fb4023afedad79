use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use shakmaty::{Color, Position};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uci_board::board_utils::render_board;
use uci_board::{ApiClient, Game};

/// Play chess against a UCI engine through the analysis API
#[derive(Debug, Parser)]
#[command(name = "uci-board", version)]
struct Args {
    /// Base URL of the analysis API
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Side you play
    #[arg(long, value_enum, default_value_t = Side::White)]
    color: Side,

    /// Starting position (defaults to the initial layout)
    #[arg(long)]
    fen: Option<String>,

    /// Fixed engine search depth; takes precedence over --movetime
    #[arg(long)]
    depth: Option<u32>,

    /// Engine thinking time per move in milliseconds
    #[arg(long, default_value_t = 600)]
    movetime: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let user = Color::from(args.color);
    let client = ApiClient::new(&args.server);

    let status = client
        .status()
        .await
        .with_context(|| format!("Could not reach {}", args.server))?;
    if !status.available {
        bail!(
            "No engine installed on the server. Download one from {}",
            status.download_url
        );
    }
    info!(engine = ?status.engine_path, "Engine available");

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    println!("Enter moves in UCI notation (e2e4, e7e8q). Type 'quit' to leave.");
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n{}", render_board(game.position().board(), user));

        if let Some(outcome) = game.outcome() {
            println!("Game over: {outcome}");
            break;
        }

        if game.turn() == user {
            println!("Your move:");
            let Some(line) = input.next_line().await? else {
                break;
            };
            let line = line.trim();
            match line {
                "" => continue,
                "quit" | "exit" => break,
                uci => {
                    if let Err(e) = game.play_user(uci) {
                        println!("{e}");
                    }
                }
            }
        } else {
            let request = game.analysis_request(args.depth, Some(args.movetime));
            let result = client.analyze(&request).await?;

            let eval = result
                .evaluation
                .as_ref()
                .map(|e| e.display.as_str())
                .unwrap_or("?");
            println!(
                "Engine plays {} (eval {eval}, depth {})",
                result.bestmove,
                result.depth.map(|d| d.to_string()).unwrap_or_else(|| "?".to_string())
            );
            if let Some(pv) = &result.pv {
                println!("Line: {pv}");
            }

            game.apply_engine_move(&result.bestmove)?;
        }
    }

    Ok(())
}
