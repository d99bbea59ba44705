//! Game state machine with history tracking.
//!
//! The [`Game`] struct owns one match: a board snapshot per ply, the moves
//! played with their SAN, and the current [`Status`]. Moves are applied
//! one at a time through the legality gate of the active rule set.

use crate::rules::{RuleSet, StandardChess, Status};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{Board, MoveList};
use chess_core::{FenError, Move};
use thiserror::Error;

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move with its derived flags.
    pub mov: Move,
    /// SAN for the move, computed on the board it was played from.
    pub san: String,
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("game has already ended")]
    GameAlreadyOver,

    #[error("invalid UCI move: {0}")]
    InvalidUci(String),

    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),
}

/// A chess game with full history.
///
/// `boards[i]` is the board before ply `i`; the last entry is the current
/// board. Snapshots are never mutated once pushed, so any earlier ply can
/// be read while play continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    boards: Vec<Board>,
    moves: Vec<GameMove>,
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(StandardChess.initial_board())
    }

    /// Creates a game from an arbitrary starting board.
    ///
    /// The status is evaluated immediately, so a board with no legal moves
    /// or a dead position starts out terminal.
    pub fn from_board(board: Board) -> Self {
        let status = StandardChess.status(&board, 1);
        Game {
            boards: vec![board],
            moves: Vec::new(),
            status,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Board::from_fen(fen).map(Self::from_board)
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        // `boards` always holds at least the starting board.
        &self.boards[self.boards.len() - 1]
    }

    /// Returns the board the game started from.
    pub fn start_board(&self) -> &Board {
        &self.boards[0]
    }

    /// Returns the board before ply `ply` (`0..=ply_count()`).
    pub fn board_at(&self, ply: usize) -> Option<&Board> {
        self.boards.get(ply)
    }

    /// Returns every board snapshot, starting board first.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Returns the move history with SAN.
    pub fn history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Iterates over the moves played, in play order.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|gm| gm.mov)
    }

    /// Returns the most recent move, if any.
    pub fn last_move(&self) -> Option<&GameMove> {
        self.moves.last()
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns true if the game has reached a terminal status.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the legal moves on the current board, or an empty list once
    /// the game is over.
    pub fn legal_moves(&self) -> MoveList {
        if self.is_over() {
            return MoveList::new();
        }
        StandardChess.legal_moves(self.board())
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.board().is_check()
    }

    /// Counts how many times the current position has occurred.
    pub fn repetition_count(&self) -> usize {
        let current = self.board().repetition_key();
        self.boards
            .iter()
            .filter(|b| b.repetition_key() == current)
            .count()
    }

    /// Returns the current board as a FEN string.
    pub fn to_fen(&self) -> String {
        self.board().to_fen()
    }

    /// Applies a candidate move.
    ///
    /// The candidate must name a legal move by source, destination and
    /// promotion choice. On error the game is left untouched.
    pub fn apply_move(&mut self, m: Move) -> Result<Status, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let resolved = StandardChess
            .resolve(self.board(), &m)
            .ok_or(GameError::IllegalMove(m))?;
        self.push(resolved)
    }

    /// Applies a move given in UCI notation (e.g. "e2e4", "e7e8q").
    pub fn apply_uci(&mut self, uci: &str) -> Result<Status, GameError> {
        let m = Move::from_uci(uci).ok_or_else(|| GameError::InvalidUci(uci.to_string()))?;
        self.apply_move(m)
    }

    /// Applies a move given in SAN.
    pub fn apply_san(&mut self, san: &str) -> Result<Status, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let m = san_to_move(self.board(), san)?;
        self.push(m)
    }

    /// Records a resolved legal move and re-evaluates the status.
    fn push(&mut self, m: Move) -> Result<Status, GameError> {
        let san = move_to_san(self.board(), m)?;
        let next = self.board().apply(m);
        self.boards.push(next);
        self.moves.push(GameMove { mov: m, san });
        self.status = StandardChess.status(self.board(), self.repetition_count());
        Ok(self.status)
    }

    /// Abandons the game.
    pub fn abort(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        self.status = Status::Aborted;
        Ok(())
    }

    /// Discards the game and starts over from the standard starting position.
    pub fn reset(&mut self) {
        *self = Game::new();
    }
}
