//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::legal_moves;
use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|m| perft(&board.apply(*m), depth - 1))
        .sum()
}

/// Perft with divide: node count below each root move, sorted by UCI text.
/// Useful for locating the move whose subtree count is wrong. At depth 0
/// no root move is played, so the list is empty.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = legal_moves(board);
    let mut results: Vec<(String, u64)> = moves
        .iter()
        .map(|m| {
            let nodes = if depth > 1 {
                perft(&board.apply(*m), depth - 1)
            } else {
                1
            };
            (m.to_uci(), nodes)
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1pP/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn divide_at_depth_zero_is_empty() {
        assert!(perft_divide(&Board::startpos(), 0).is_empty());
        assert_eq!(perft(&Board::startpos(), 0), 1);
    }

    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&Board::startpos(), 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&Board::startpos(), 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&Board::startpos(), 3), 8902);
    }

    #[test]
    fn perft_kiwipete() {
        let board = Board::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&board, 1), 48);
        assert_eq!(perft(&board, 2), 2039);
    }

    // Position 3 of the common perft suite: en passant and discovered checks
    // along the fifth rank.
    #[test]
    fn perft_en_passant_position() {
        let board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&board, 1), 14);
        assert_eq!(perft(&board, 2), 191);
        assert_eq!(perft(&board, 3), 2812);
    }

    // Position 4 of the common perft suite: promotions and castling under fire.
    #[test]
    fn perft_promotion_position() {
        let board =
            Board::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
                .unwrap();
        assert_eq!(perft(&board, 1), 6);
        assert_eq!(perft(&board, 2), 264);
    }

    #[test]
    fn perft_depth_zero_is_one() {
        assert_eq!(perft(&Board::startpos(), 0), 1);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let board = Board::startpos();
        let divide = perft_divide(&board, 2);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert!(divide.iter().all(|(_, n)| *n == 20));
        assert_eq!(divide[0].0, "a2a3");
    }
}
