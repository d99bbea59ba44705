//! Rule set abstraction.
//!
//! This module provides the [`RuleSet`] trait, which owns everything that
//! decides whether a game continues: the legal-move gate and the status
//! evaluation after each ply. [`Game`](crate::Game) delegates to it.

mod standard;

pub use standard::StandardChess;

use crate::{Board, MoveList};
use chess_core::Move;
use std::fmt;

/// Status of a game after its latest ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Play continues and the side to move is not in check.
    InProgress,
    /// Play continues with the side to move in check.
    InCheck,
    /// The side to move is in check and has no legal move.
    Checkmate,
    /// The side to move is not in check and has no legal move.
    Stalemate,
    /// 100 plies without a pawn move or capture.
    DrawFiftyMove,
    /// Neither side can deliver checkmate by any sequence of moves.
    DrawInsufficientMaterial,
    /// The same position occurred for the third time.
    DrawRepetition,
    /// Play was abandoned.
    Aborted,
}

impl Status {
    /// Returns true once no further move may be applied.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::InProgress | Status::InCheck)
    }

    /// Returns true for the draw outcomes.
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            Status::Stalemate
                | Status::DrawFiftyMove
                | Status::DrawInsufficientMaterial
                | Status::DrawRepetition
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::InProgress => "in progress",
            Status::InCheck => "check",
            Status::Checkmate => "checkmate",
            Status::Stalemate => "stalemate",
            Status::DrawFiftyMove => "draw by fifty-move rule",
            Status::DrawInsufficientMaterial => "draw by insufficient material",
            Status::DrawRepetition => "draw by threefold repetition",
            Status::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}

/// Trait for the rules a [`Game`](crate::Game) is played under.
///
/// # Example
///
/// ```
/// use chess_engine::{RuleSet, StandardChess, Status};
///
/// let board = StandardChess.initial_board();
/// assert_eq!(StandardChess.legal_moves(&board).len(), 20);
/// assert_eq!(StandardChess.status(&board, 1), Status::InProgress);
/// ```
pub trait RuleSet {
    /// Returns the board a new game starts from.
    fn initial_board(&self) -> Board;

    /// Generates all legal moves for the side to move.
    fn legal_moves(&self, board: &Board) -> MoveList;

    /// Resolves a candidate to the legal move it names, with derived flags.
    fn resolve(&self, board: &Board, candidate: &Move) -> Option<Move> {
        self.legal_moves(board).find(candidate)
    }

    /// Returns true if the candidate names a legal move.
    fn is_legal(&self, board: &Board, candidate: &Move) -> bool {
        self.resolve(board, candidate).is_some()
    }

    /// Returns true if neither side has enough material to checkmate.
    fn is_insufficient_material(&self, board: &Board) -> bool;

    /// Evaluates the status of `board`, given how many times its repetition
    /// key has occurred in the game so far (including this occurrence).
    fn status(&self, board: &Board, repetitions: usize) -> Status;
}
