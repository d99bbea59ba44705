//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use chess_core::Move;
use chess_engine::movegen::perft::{perft as count_nodes, perft_divide};
use chess_engine::{notation, Board, Game, Status};
use chess_session::{AuthContext, AuthToken, Credentials, HttpGateway, Session, SessionConfig};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Applies each move to `game`, reading coordinate form first and SAN otherwise.
fn play_moves(game: &mut Game, moves: &[String]) -> Result<Status> {
    let mut status = game.status();
    for (i, text) in moves.iter().enumerate() {
        status = match Move::from_uci(text) {
            Some(m) => game.apply_move(m),
            None => game.apply_san(text),
        }
        .with_context(|| format!("move {} ({})", i + 1, text))?;
    }
    Ok(status)
}

/// Multi-line summary of where a game stands.
fn describe(game: &Game) -> String {
    let board = game.board();
    format!(
        "{}\nfen:    {}\nstatus: {}\nplies:  {}\nmoves:  {}",
        board,
        board.to_fen(),
        game.status(),
        game.ply_count(),
        notation::encode(game)
    )
}

pub fn replay(moves: &[String], pgn: Option<&Path>, fen: Option<&str>) -> Result<()> {
    let game = match pgn {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            notation::decode(&text)?
        }
        None => {
            let mut game = match fen {
                Some(fen) => Game::from_fen(fen)?,
                None => Game::new(),
            };
            play_moves(&mut game, moves)?;
            game
        }
    };
    println!("{}", describe(&game));
    Ok(())
}

pub fn perft(depth: u32, fen: Option<&str>, divide: bool) -> Result<()> {
    let board = match fen {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::startpos(),
    };
    let start = Instant::now();
    let nodes = if divide {
        let counts = perft_divide(&board, depth);
        for (m, n) in &counts {
            println!("{}: {}", m, n);
        }
        if counts.is_empty() {
            count_nodes(&board, depth)
        } else {
            counts.iter().map(|(_, n)| n).sum::<u64>()
        }
    } else {
        count_nodes(&board, depth)
    };
    let elapsed = start.elapsed();
    println!("\nNodes: {}", nodes);
    println!("Time:  {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn session(config: &Path, token: Option<String>) -> Result<Session<HttpGateway>> {
    let config = SessionConfig::load_from(config)?;
    let gateway = HttpGateway::from_config(&config)?;
    debug!(url = %config.gateway_url, timeout_ms = config.request_timeout_ms, "gateway configured");
    let auth = match token {
        Some(token) => AuthContext::with_token(AuthToken::new(token)),
        None => AuthContext::anonymous(),
    };
    Ok(Session::new(gateway, auth).with_timeout(config.request_timeout()))
}

pub async fn register(config: &Path, username: &str, password: &str) -> Result<()> {
    let session = session(config, None)?;
    let user = session.register(&Credentials::new(username, password)).await?;
    println!("Registered {} (id {})", user.username, user.id);
    Ok(())
}

pub async fn login(config: &Path, username: &str, password: &str) -> Result<()> {
    let session = session(config, None)?;
    let token = session.login(&Credentials::new(username, password)).await?;
    println!("{}", token.as_str());
    Ok(())
}

pub async fn save(config: &Path, token: Option<String>, moves: &[String]) -> Result<()> {
    if moves.is_empty() {
        bail!("no moves given");
    }
    let session = session(config, token)?;
    let mut game = Game::new();
    play_moves(&mut game, moves)?;
    session.resume(game).await;
    let id = session.save().await?;
    println!("Saved game {}", id);
    Ok(())
}

pub async fn list(config: &Path, token: Option<String>) -> Result<()> {
    let session = session(config, token)?;
    let games = session.load_all().await?;
    if games.is_empty() {
        println!("No stored games");
    }
    for loaded in &games {
        match &loaded.game {
            Ok(game) => println!(
                "#{:<5} {:<30} {}",
                loaded.id,
                game.status(),
                notation::encode(game)
            ),
            Err(e) => println!("#{:<5} unreadable: {}", loaded.id, e),
        }
    }
    Ok(())
}

pub async fn analysis(config: &Path, token: Option<String>) -> Result<()> {
    let session = session(config, token)?;
    let summary = session.play_style().await?;
    println!("Games:       {}", summary.total_games);
    println!("Aggression:  {}", summary.aggressive_score);
    println!("Defense:     {}", summary.defensive_score);
    if let Some(opening) = &summary.opening_preference {
        println!("Opening:     {}", opening);
    }
    println!("Personality: {}", summary.personality_type);
    println!("Plays like:  {}", summary.celebrity_match);
    Ok(())
}
