//! `chess` - play, inspect and store games from the command line.
//!
//! Local commands (`replay`, `perft`) only use the rules engine. Account
//! commands talk to the persistence gateway configured in `session.toml`.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Chess rules engine and game persistence client")]
struct Cli {
    /// Path to the session configuration file
    #[arg(long, global = true, default_value = "session.toml")]
    config: PathBuf,

    /// Bearer token from a previous `login`
    #[arg(long, global = true, env = "CHESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay moves and print the resulting position
    Replay {
        /// Moves in SAN (Nf3) or coordinate form (g1f3)
        moves: Vec<String>,
        /// Read movetext from a PGN file instead
        #[arg(long, conflicts_with = "moves")]
        pgn: Option<PathBuf>,
        /// Start from this position instead of the initial one
        #[arg(long)]
        fen: Option<String>,
    },
    /// Count leaf nodes of the move tree
    Perft {
        /// Search depth in plies
        depth: u32,
        /// Position to count from
        #[arg(long)]
        fen: Option<String>,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Create an account
    Register {
        username: String,
        #[arg(long, env = "CHESS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and print a token for CHESS_TOKEN
    Login {
        username: String,
        #[arg(long, env = "CHESS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Play the given moves and store the game
    Save {
        /// Moves in SAN or coordinate form
        moves: Vec<String>,
    },
    /// List stored games
    List,
    /// Show the play-style summary for the signed-in user
    Analysis,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { moves, pgn, fen } => {
            commands::replay(&moves, pgn.as_deref(), fen.as_deref())
        }
        Commands::Perft { depth, fen, divide } => commands::perft(depth, fen.as_deref(), divide),
        Commands::Register { username, password } => {
            commands::register(&cli.config, &username, &password).await
        }
        Commands::Login { username, password } => {
            commands::login(&cli.config, &username, &password).await
        }
        Commands::Save { moves } => commands::save(&cli.config, cli.token, &moves).await,
        Commands::List => commands::list(&cli.config, cli.token).await,
        Commands::Analysis => commands::analysis(&cli.config, cli.token).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_replay_moves() {
        let cli = Cli::try_parse_from(["chess", "replay", "e4", "e5", "Nf3"]).unwrap();
        match cli.command {
            Commands::Replay { moves, pgn, .. } => {
                assert_eq!(moves, ["e4", "e5", "Nf3"]);
                assert!(pgn.is_none());
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn token_flag_is_global() {
        let cli = Cli::try_parse_from(["chess", "list", "--token", "abc"]).unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
    }
}
