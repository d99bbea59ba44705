//! Standard chess rules implementation.

use super::{RuleSet, Status};
use crate::{movegen, Board, MoveList};
use chess_core::PieceKind;

/// Plies without a pawn move or capture that end the game.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Occurrences of one position that end the game.
pub const REPETITION_LIMIT: usize = 3;

/// Standard chess rules.
///
/// Draws are applied automatically rather than claimed: the game ends as
/// soon as the halfmove clock reaches 100 or a position occurs a third time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_board(&self) -> Board {
        Board::startpos()
    }

    fn legal_moves(&self, board: &Board) -> MoveList {
        movegen::legal_moves(board)
    }

    fn is_insufficient_material(&self, board: &Board) -> bool {
        let mut minors = 0;
        let mut bishop_shades = [false; 2];
        let mut knights = 0;

        for (sq, piece) in board.pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight => {
                    minors += 1;
                    knights += 1;
                }
                PieceKind::Bishop => {
                    minors += 1;
                    bishop_shades[usize::from(sq.is_dark())] = true;
                }
            }
        }

        // K vs K, or a single minor piece on the board.
        if minors <= 1 {
            return true;
        }
        // Bishops only, all on squares of one shade.
        knights == 0 && !(bishop_shades[0] && bishop_shades[1])
    }

    fn status(&self, board: &Board, repetitions: usize) -> Status {
        let in_check = board.is_check();

        if self.legal_moves(board).is_empty() {
            return if in_check {
                Status::Checkmate
            } else {
                Status::Stalemate
            };
        }
        if board.halfmove_clock() >= FIFTY_MOVE_PLIES {
            return Status::DrawFiftyMove;
        }
        if repetitions >= REPETITION_LIMIT {
            return Status::DrawRepetition;
        }
        if self.is_insufficient_material(board) {
            return Status::DrawInsufficientMaterial;
        }
        if in_check {
            Status::InCheck
        } else {
            Status::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn initial_board() {
        let b = StandardChess.initial_board();
        assert_eq!(b.to_fen(), chess_core::FenParser::STARTPOS);
        assert_eq!(StandardChess.status(&b, 1), Status::InProgress);
    }

    #[test]
    fn checkmate_and_check() {
        let mate = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(StandardChess.status(&mate, 1), Status::Checkmate);

        let check = board("R3k3/8/8/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(StandardChess.status(&check, 1), Status::InCheck);
    }

    #[test]
    fn stalemate() {
        let b = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(StandardChess.status(&b, 1), Status::Stalemate);
    }

    #[test]
    fn mate_outranks_fifty_move_rule() {
        let b = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 100 3");
        assert_eq!(StandardChess.status(&b, 1), Status::Checkmate);
    }

    #[test]
    fn fifty_move_rule() {
        let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 99 80");
        assert_eq!(StandardChess.status(&b, 1), Status::InProgress);
        let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 100 80");
        assert_eq!(StandardChess.status(&b, 1), Status::DrawFiftyMove);
    }

    #[test]
    fn repetition_needs_three_occurrences() {
        let b = Board::startpos();
        assert_eq!(StandardChess.status(&b, 2), Status::InProgress);
        assert_eq!(StandardChess.status(&b, 3), Status::DrawRepetition);
    }

    #[test]
    fn insufficient_material() {
        for fen in [
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KN2 w - - 0 1",
            "4kb2/8/8/8/8/8/8/4K3 w - - 0 1",
            // Bishops on same-shade squares (c1 and f8 are both dark).
            "4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1",
        ] {
            let b = board(fen);
            assert!(StandardChess.is_insufficient_material(&b), "{}", fen);
            assert_eq!(
                StandardChess.status(&b, 1),
                Status::DrawInsufficientMaterial
            );
        }
    }

    #[test]
    fn sufficient_material() {
        for fen in [
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/R3K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3NKN2 w - - 0 1",
            "4kn2/8/8/8/8/8/8/2B1K3 w - - 0 1",
            // Opposite-shade bishops (c1 dark, c8 light).
            "2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        ] {
            assert!(!StandardChess.is_insufficient_material(&board(fen)), "{}", fen);
        }
    }

    #[test]
    fn status_helpers() {
        assert!(!Status::InProgress.is_terminal());
        assert!(!Status::InCheck.is_terminal());
        assert!(Status::Checkmate.is_terminal());
        assert!(Status::Aborted.is_terminal());
        assert!(Status::Stalemate.is_draw());
        assert!(!Status::Checkmate.is_draw());
        assert!(!Status::Aborted.is_draw());
        assert_eq!(Status::Checkmate.to_string(), "checkmate");
    }

    #[test]
    fn resolve_fills_flags() {
        let b = Board::startpos();
        let candidate = chess_core::Move::from_uci("e2e4").unwrap();
        let resolved = StandardChess.resolve(&b, &candidate).unwrap();
        assert!(resolved.is_double_push());
        assert!(!StandardChess.is_legal(&b, &chess_core::Move::from_uci("e2e5").unwrap()));
    }
}
